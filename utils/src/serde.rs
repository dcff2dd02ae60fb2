pub type SerdePathError = serde_path_to_error::Error<serde_json::Error>;

/// Deserialise with the JSON path of the offending field in the error.
pub trait SerdeResponseParse {
    type Error;

    fn serde_parse_custom<T>(self) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

impl SerdeResponseParse for &str {
    type Error = SerdePathError;

    fn serde_parse_custom<T>(self) -> Result<T, SerdePathError>
    where
        T: serde::de::DeserializeOwned,
    {
        serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(self))
    }
}
