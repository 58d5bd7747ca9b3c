use bevy::prelude::Image;
use bevy::render::render_resource::TextureFormat;
use tree_scatter::prelude::Alphamap;

/// Snapshots a Bevy [`Image`] as an [`Alphamap`].
///
/// `R8Unorm` images become a single layer. Four-channel 8-bit images become four layers
/// in R, G, B, A order, also when the pixels are stored as BGRA. Returns `None` for
/// other formats or images without CPU-side data. Re-create the alphamap when the
/// source [`Image`] changes.
pub fn alphamap_from_image(image: &Image) -> Option<Alphamap> {
    let format = image.texture_descriptor.format;
    let width = image.texture_descriptor.size.width as usize;
    let height = image.texture_descriptor.size.height as usize;
    let pixels = image.data.as_deref()?;

    match format {
        TextureFormat::R8Unorm => {
            let layer = pixels.iter().map(|&b| b as f32 / 255.0).collect();
            Alphamap::from_layers(width, height, vec![layer]).ok()
        }
        TextureFormat::Rgba8Unorm | TextureFormat::Rgba8UnormSrgb => {
            Alphamap::from_rgba8(width, height, pixels).ok()
        }
        TextureFormat::Bgra8Unorm | TextureFormat::Bgra8UnormSrgb => {
            let rgba: Vec<u8> = pixels
                .chunks_exact(4)
                .flat_map(|px| [px[2], px[1], px[0], px[3]])
                .collect();
            Alphamap::from_rgba8(width, height, &rgba).ok()
        }
        _ => None,
    }
}
