use crate::errors::NodeError;
use std::io::Read;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn from_arg(arg: Option<&str>) -> Result<Self, NodeError> {
        match arg.map(str::trim) {
            None | Some("-") => Ok(InputSource::Stdin),
            Some("") => Err(NodeError::invalid_input("--input must not be empty")),
            Some(path) => Ok(InputSource::File(PathBuf::from(path))),
        }
    }

    pub fn read_to_string(&self) -> Result<String, NodeError> {
        match self {
            InputSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                Ok(buf)
            }
            InputSource::File(path) => std::fs::read_to_string(path).map_err(|err| {
                NodeError::invalid_input(format!(
                    "Failed to read input file {}: {}",
                    path.display(),
                    err
                ))
            }),
        }
    }
}
