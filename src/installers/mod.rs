// Wrappers around external installers used by the pipeline.

/// Declares the `pip` module: interpreter check, pip self-upgrade and the
/// single `pip install -r` call over the manifest.
pub(crate) mod pip;
