use bevy::prelude::*;
use bevy::reflect::TypePath;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tree_scatter::prelude::{Curve, ScatterSettings};

/// Asset describing one tree scatter pass: which alphamap layer to read, the
/// probability curve and the sampler settings.
///
/// `prototype_count` in `settings` is replaced by the count sent with each request.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Asset, TypePath, Clone, Debug)]
pub struct TreeScatterAsset {
    pub layer_index: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub curve: Curve,
    #[cfg_attr(feature = "serde", serde(default))]
    pub settings: ScatterSettings,
}

impl TreeScatterAsset {
    pub fn new(layer_index: usize, curve: Curve, settings: ScatterSettings) -> Self {
        Self {
            layer_index,
            curve,
            settings,
        }
    }
}

#[cfg(feature = "ron")]
pub use loader::TreeScatterAssetLoader;

#[cfg(feature = "ron")]
mod loader {
    use core::result::Result;

    use bevy::asset::io::Reader;
    use bevy::asset::{AssetLoader, LoadContext};
    use bevy::prelude::*;
    use bevy::reflect::TypePath;
    use bevy::tasks::ConditionalSendFuture;

    use super::TreeScatterAsset;

    /// Asset loader for [`TreeScatterAsset`] using RON files with `.trees` extension.
    #[derive(TypePath)]
    pub struct TreeScatterAssetLoader;

    impl AssetLoader for TreeScatterAssetLoader {
        type Asset = TreeScatterAsset;
        type Settings = ();
        type Error = anyhow::Error;

        fn extensions(&self) -> &[&str] {
            &["trees"]
        }

        fn load(
            &self,
            reader: &mut dyn Reader,
            _settings: &Self::Settings,
            _context: &mut LoadContext,
        ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
            Box::pin(async move {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes).await?;
                parse_asset(&bytes)
            })
        }
    }

    impl FromWorld for TreeScatterAssetLoader {
        fn from_world(_: &mut World) -> Self {
            TreeScatterAssetLoader
        }
    }

    pub(super) fn parse_asset(bytes: &[u8]) -> anyhow::Result<TreeScatterAsset> {
        let asset: TreeScatterAsset =
            ron::de::from_bytes(bytes).map_err(|e| anyhow::anyhow!(e))?;
        asset.settings.validate()?;
        Ok(asset)
    }
}
