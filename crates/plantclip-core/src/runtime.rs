//! ONNX Runtime session construction shared by both encoders.

use std::path::Path;

use ort::session::Session;

use crate::error::{ClassifyError, ClassifyResult};

/// Open an ONNX model, selecting the execution device.
///
/// With `use_cpu = false` the CUDA provider is registered when the crate was
/// built with the `cuda` feature; otherwise inference stays on the CPU.
pub(crate) fn open_session(model_path: &Path, use_cpu: bool) -> ClassifyResult<Session> {
    let builder = Session::builder().map_err(|e| {
        ClassifyError::model(format!("Failed to create ONNX session builder: {e}"))
    })?;

    let builder = if use_cpu {
        tracing::debug!("Using CPU execution for {:?}", model_path);
        builder
    } else {
        with_accelerator(builder)?
    };

    builder.commit_from_file(model_path).map_err(|e| {
        ClassifyError::model(format!("Failed to load ONNX model {:?}: {e}", model_path))
    })
}

/// Name of the device sessions run on, for status reporting.
pub(crate) fn device_name(use_cpu: bool) -> &'static str {
    if use_cpu || !cfg!(feature = "cuda") {
        "cpu"
    } else {
        "cuda"
    }
}

#[cfg(feature = "cuda")]
fn with_accelerator(
    builder: ort::session::builder::SessionBuilder,
) -> ClassifyResult<ort::session::builder::SessionBuilder> {
    use ort::execution_providers::CUDAExecutionProvider;

    tracing::info!("Registering CUDA execution provider");
    builder
        .with_execution_providers([CUDAExecutionProvider::default().build()])
        .map_err(|e| ClassifyError::model(format!("Failed to register CUDA provider: {e}")))
}

#[cfg(not(feature = "cuda"))]
fn with_accelerator(
    builder: ort::session::builder::SessionBuilder,
) -> ClassifyResult<ort::session::builder::SessionBuilder> {
    tracing::warn!("GPU requested but plantclip-core was built without the `cuda` feature; using CPU");
    Ok(builder)
}
