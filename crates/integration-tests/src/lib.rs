//! Black-box integration tests live under `tests/`
