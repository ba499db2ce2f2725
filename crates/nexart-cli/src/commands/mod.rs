pub(crate) mod dest;
pub(crate) mod migrate;
pub(crate) mod source;
