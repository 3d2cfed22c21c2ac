pub(crate) mod loopback;
pub(crate) mod still;
