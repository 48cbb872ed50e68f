use thiserror::Error;

/// 编解码错误 Codec error
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
  #[error("malformed symbol table: {0}")]
  MalformedTable(&'static str),

  #[error("output buffer too small: need {need}, have {have}")]
  OutputTooSmall { need: usize, have: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
