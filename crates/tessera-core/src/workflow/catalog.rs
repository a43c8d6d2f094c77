//! Static catalog of the node types the orchestrator can translate.

use std::collections::BTreeMap;

use tessera_types::catalog::{NodeCatalog, NodeDefinition};

fn ports(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(name, ty)| (name.to_string(), ty.to_string()))
        .collect()
}

fn definition(
    name: &str,
    category: &str,
    inputs: &[(&str, &str)],
    outputs: &[(&str, &str)],
) -> NodeDefinition {
    NodeDefinition {
        name: name.to_string(),
        category: category.to_string(),
        inputs: ports(inputs),
        outputs: ports(outputs),
    }
}

/// The fixed node catalog returned by `ListNodes`.
pub fn node_catalog() -> NodeCatalog {
    NodeCatalog {
        nodes: vec![
            definition(
                "CheckpointLoaderSimple",
                "loaders",
                &[],
                &[("MODEL", "MODEL"), ("CLIP", "CLIP"), ("VAE", "VAE")],
            ),
            definition(
                "CLIPTextEncode",
                "conditioning",
                &[("clip", "CLIP")],
                &[("CONDITIONING", "CONDITIONING")],
            ),
            definition("EmptyLatentImage", "latent", &[], &[("LATENT", "LATENT")]),
            definition(
                "KSampler",
                "sampling",
                &[
                    ("model", "MODEL"),
                    ("positive", "CONDITIONING"),
                    ("negative", "CONDITIONING"),
                    ("latent_image", "LATENT"),
                ],
                &[("LATENT", "LATENT")],
            ),
            definition(
                "VAEDecode",
                "latent",
                &[("samples", "LATENT"), ("vae", "VAE")],
                &[("IMAGE", "IMAGE")],
            ),
            definition("SaveImage", "image", &[("images", "IMAGE")], &[]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::translator::NodeKind;

    #[test]
    fn test_catalog_lists_six_nodes() {
        let catalog = node_catalog();
        let names: Vec<&str> = catalog.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "CheckpointLoaderSimple",
                "CLIPTextEncode",
                "EmptyLatentImage",
                "KSampler",
                "VAEDecode",
                "SaveImage"
            ]
        );
    }

    #[test]
    fn test_catalog_entries_are_translatable() {
        for node in node_catalog().nodes {
            assert_ne!(NodeKind::of(&node.name), NodeKind::Other, "{}", node.name);
        }
    }

    #[test]
    fn test_sampler_ports() {
        let catalog = node_catalog();
        let sampler = catalog
            .nodes
            .iter()
            .find(|n| n.name == "KSampler")
            .unwrap();
        assert_eq!(sampler.inputs.len(), 4);
        assert_eq!(sampler.inputs["latent_image"], "LATENT");
        assert_eq!(sampler.outputs["LATENT"], "LATENT");
    }
}
