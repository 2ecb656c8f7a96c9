use thiserror::Error;

#[derive(Error, Debug)]
pub enum PushoverError {
    #[error("request to Pushover failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Pushover rejected the message: {}", errors.join(", "))]
    Api { errors: Vec<String> },
}
