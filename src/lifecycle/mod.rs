pub(crate) mod machine;
pub(crate) mod retry;
pub(crate) mod state;
