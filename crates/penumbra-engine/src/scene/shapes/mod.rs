pub(crate) mod shadow;
