//! GPU capability detection
//!
//! The engine only runs when a hardware-accelerated context can be created.
//! Probing never fails loudly: every problem, including a panic inside the
//! driver layer, is reported as [`Capability::Unsupported`].

use std::fmt;

use serde::Serialize;

/// Description of the adapter a probe found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterSummary {
    pub name: String,
    pub backend: String,
    pub device_type: String,
}

impl fmt::Display for AdapterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.backend, self.device_type)
    }
}

/// Outcome of a capability probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Capability {
    Supported(AdapterSummary),
    Unsupported { reason: String },
}

impl Capability {
    /// Whether rendering can proceed
    pub fn is_supported(&self) -> bool {
        matches!(self, Capability::Supported(_))
    }

    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Capability::Unsupported {
            reason: reason.into(),
        }
    }
}

/// Something that can tell whether a rendering context is available
pub trait CapabilityProbe {
    fn probe(&self) -> Capability;
}

/// Probe that asks wgpu for an adapter and a device, then drops both.
#[derive(Debug, Clone, Copy, Default)]
pub struct WgpuProbe;

impl CapabilityProbe for WgpuProbe {
    #[cfg(feature = "gpu")]
    fn probe(&self) -> Capability {
        let attempt = std::panic::catch_unwind(|| {
            pollster::block_on(crate::gpu::create_render_device())
                .map(|context| context.adapter_summary())
        });
        let capability = match attempt {
            Ok(Ok(summary)) => Capability::Supported(summary),
            Ok(Err(err)) => Capability::unsupported(err.to_string()),
            Err(_) => Capability::unsupported("graphics driver panicked during initialization"),
        };
        tracing::debug!(?capability, "probed GPU");
        capability
    }

    #[cfg(not(feature = "gpu"))]
    fn probe(&self) -> Capability {
        Capability::unsupported("built without GPU support (enable the `gpu` feature)")
    }
}

/// Probe returning a fixed verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProbe(pub Capability);

impl StaticProbe {
    /// Always supported, with a placeholder adapter
    pub fn supported() -> Self {
        StaticProbe(Capability::Supported(AdapterSummary {
            name: "headless".to_string(),
            backend: "none".to_string(),
            device_type: "virtual".to_string(),
        }))
    }

    /// Always unsupported with `reason`
    pub fn unsupported(reason: impl Into<String>) -> Self {
        StaticProbe(Capability::unsupported(reason))
    }
}

impl CapabilityProbe for StaticProbe {
    fn probe(&self) -> Capability {
        self.0.clone()
    }
}

/// Probe the default GPU stack
pub fn probe() -> Capability {
    WgpuProbe.probe()
}
