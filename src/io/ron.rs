//! RON I/O
use crate::error::Result;
use crate::traits::{ConvertToSerializable, RONExport, RONImport};

impl<G: ConvertToSerializable> RONExport for G {
    fn to_ron_string(&self) -> Result<String> {
        Ok(ron::to_string(&self.to_serializable())?)
    }
}

impl<G: ConvertToSerializable> RONImport for G
where
    for<'a> G::SerializableType: serde::Deserialize<'a>,
{
    fn from_ron_string(s: &str) -> Result<Self> {
        Self::from_serializable(ron::from_str(s)?)
    }
}
