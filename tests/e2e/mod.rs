// End-to-end tests for the BootCaster HTTP API
//
// Each test gets its own server on an ephemeral port, wired to in-memory
// repositories, a scripted speech provider and a temporary audio directory,
// so the whole suite runs without external services. Provider contract tests
// use wiremock; the Postgres repository tests need docker and are ignored by
// default.

mod test_entitlement;
mod test_keys;
mod test_voices;
