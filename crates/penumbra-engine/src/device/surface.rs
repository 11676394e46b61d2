//! Surface configuration choices, kept free of live wgpu objects.

/// Picks the swapchain format: an sRGB 8-bit format when preferred and
/// available, otherwise the adapter's first choice.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    formats.first().copied()
}

/// Honors the requested alpha mode when supported, else the first supported one.
pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| supported.contains(m))
        .or_else(|| supported.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode as A, TextureFormat as F};

    #[test]
    fn prefers_srgb_when_available() {
        let formats = [F::Bgra8Unorm, F::Rgba8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(F::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&formats, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_first_format() {
        assert_eq!(choose_surface_format(&[F::Rgba16Float], true), Some(F::Rgba16Float));
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn alpha_mode_respects_support() {
        let supported = [A::Opaque, A::PreMultiplied];
        assert_eq!(choose_alpha_mode(&supported, Some(A::PreMultiplied)), A::PreMultiplied);
        assert_eq!(choose_alpha_mode(&supported, Some(A::PostMultiplied)), A::Opaque);
        assert_eq!(choose_alpha_mode(&[], None), A::Auto);
    }
}
