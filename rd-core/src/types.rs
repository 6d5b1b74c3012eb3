/// Number of completed steps behind a [`crate::state::Fields`] snapshot.
///
/// Starts at 0 after construction or [`crate::state::Simulation::reset`]
/// and increases by one per [`crate::state::Simulation::step`].
pub type Generation = u64;
