use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SelectAnswerRequest {
    #[serde(alias = "selectedOption")]
    #[validate(range(min = 0, max = 3, message = "option must be between 0 and 3"))]
    pub(crate) option: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JumpRequest {
    pub(crate) index: usize,
}
