mod github_provider;
mod migrate;
mod mocks;
