use thiserror::Error;

#[derive(Debug, Error)]
pub enum PropsError {
    #[error("store error: {0}")]
    Store(#[from] dotprops_store::StoreError),

    #[error("serial error: {0}")]
    Serial(#[from] dotprops_serial::SerialError),
}

pub type PropsResult<T> = Result<T, PropsError>;
