mod registry;

pub(crate) use registry::Registry;
