pub mod device;

#[cfg(test)]
pub(crate) mod mock;
