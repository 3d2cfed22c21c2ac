pub(crate) mod frame;
pub(crate) mod receiver;
pub(crate) mod slot;
