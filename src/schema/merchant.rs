use crate::schema::shape::{Field, Shape};
use std::sync::OnceLock;

/// The shape every persisted merchant record must have
///
/// Field names are the serialized (JSON) names of
/// [`CandidateRecord`](crate::extract::CandidateRecord).
pub fn merchant_shape() -> &'static Shape {
    static SHAPE: OnceLock<Shape> = OnceLock::new();
    SHAPE.get_or_init(build)
}

fn build() -> Shape {
    Shape::Object(vec![
        Field::required("platform_specific_merchant_id", Shape::String),
        Field::required("platform_specific_merchant_name", Shape::String),
        Field::required("name", Shape::String),
        Field::required(
            "location",
            Shape::Object(vec![
                Field::required("address", address()),
                Field::optional("locatedIn", Shape::String),
            ]),
        ),
        Field::optional("about", Shape::String),
        Field::optional("website", Shape::String),
        Field::required("phoneNumber", Shape::String),
        Field::required("dollarRating", Shape::String),
        Field::required("hours", hours()),
        Field::required("reviews", Shape::array(review())),
        Field::required("foodItems", Shape::array(food_item())),
        Field::required("categories", Shape::array(Shape::String)),
        Field::required("type", Shape::String),
    ])
}

fn address() -> Shape {
    Shape::Object(vec![
        Field::required("address", Shape::String),
        Field::required("city", Shape::String),
        Field::required("country", Shape::String),
        Field::required("state", Shape::String),
        Field::required("zip", Shape::String),
    ])
}

fn hours() -> Shape {
    Shape::Object(
        [
            "monday",
            "tuesday",
            "wednesday",
            "thursday",
            "friday",
            "saturday",
            "sunday",
        ]
        .into_iter()
        .map(|day| Field::optional(day, Shape::String))
        .collect(),
    )
}

fn image() -> Vec<Field> {
    vec![
        Field::required("src", Shape::String),
        Field::required("alt", Shape::String),
    ]
}

fn review() -> Shape {
    Shape::Object(vec![
        Field::optional("dateExact", Shape::String),
        Field::required("dateApprox", Shape::String),
        Field::required("text", Shape::String),
        Field::required("rating", Shape::Number),
        Field::required("location", Shape::String),
        Field::required("totalUserReviewCount", Shape::Number),
        Field::required("images", Shape::array(Shape::Object(image()))),
    ])
}

fn food_item() -> Shape {
    let mut dish_image = image();
    dish_image.push(Field::required("timeUploaded", Shape::String));

    Shape::Object(vec![
        Field::required("title", Shape::String),
        Field::required("images", Shape::array(Shape::Object(dish_image))),
        Field::required(
            "reviews",
            Shape::array(Shape::Object(vec![
                Field::required("text", Shape::String),
                Field::required("rating", Shape::Number),
                Field::required("totalUserReviewCount", Shape::Number),
                Field::required("date", Shape::String),
            ])),
        ),
        Field::optional("isDrink", Shape::Bool),
    ])
}
