//! RepositoryService adapters

mod fixture;

pub use fixture::FixtureRepositoryService;
