// Chronomarks services
// Stateless partitioning and materialization, plus the organizer that drives them.

pub mod materializer;
pub mod organizer;
pub mod partitioner;
