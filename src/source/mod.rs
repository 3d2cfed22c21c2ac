pub(crate) mod directory;
pub(crate) mod wire;
