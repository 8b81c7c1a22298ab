pub mod builder;
pub mod chan_details;
pub mod estimate;
pub mod pins;
pub mod rr_graph;
pub mod track_alloc;

#[cfg(test)]
mod test_arch;
