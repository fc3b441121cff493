use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ValueResponse<T> {
    #[serde(rename = "Value")]
    value: T,
}

impl<T> ValueResponse<T> {
    pub(crate) fn into(self) -> T {
        self.value
    }
}
