//! Object materials.
//!
//! A [`Material`] is plain value data: a diffuse colour, a specular colour and
//! a shininess exponent. The [`MaterialLibrary`] is built once and then only
//! read; nothing can add or change a material afterwards.

use std::collections::HashMap;

use cgmath::Vector3;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub tag: String,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

impl Material {
    pub fn new(
        tag: &str,
        diffuse_color: [f32; 3],
        specular_color: [f32; 3],
        shininess: f32,
    ) -> Self {
        Self {
            tag: tag.to_string(),
            diffuse_color: diffuse_color.into(),
            specular_color: specular_color.into(),
            shininess,
        }
    }
}

/// Read-only table of materials with O(1) lookup by tag.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<Material>,
    index: HashMap<String, usize>,
}

impl MaterialLibrary {
    /// The twelve materials of the still-life.
    pub fn scene_defaults() -> Self {
        [
            // polished silver
            Material::new("metal", [0.7, 0.7, 0.7], [0.9, 0.9, 0.9], 64.0),
            Material::new("wood", [0.3, 0.2, 0.1], [0.1, 0.1, 0.1], 16.0),
            // tinted glass
            Material::new("glass", [0.2, 0.2, 0.3], [1.0, 1.0, 1.0], 128.0),
            Material::new("plate", [0.5, 0.5, 0.5], [0.3, 0.3, 0.3], 24.0),
            Material::new("backdrop", [0.8, 0.8, 0.9], [0.2, 0.2, 0.2], 8.0),
            // coffee
            Material::new("liquid", [0.4, 0.25, 0.1], [0.5, 0.3, 0.2], 30.0),
            Material::new("cover", [1.0, 1.0, 1.0], [0.9, 0.9, 0.9], 64.0),
            Material::new("spine", [0.3, 0.15, 0.15], [0.4, 0.2, 0.2], 20.0),
            Material::new("pages", [0.9, 0.9, 0.85], [0.2, 0.2, 0.2], 5.0),
            Material::new("leaf", [0.2, 0.6, 0.2], [0.1, 0.3, 0.1], 6.0),
            Material::new("soil", [0.2, 0.1, 0.0], [0.05, 0.02, 0.01], 4.0),
            Material::new("clay", [0.8, 0.5, 0.3], [0.2, 0.1, 0.05], 16.0),
        ]
        .into_iter()
        .collect()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn lookup(&self, tag: &str) -> Option<Material> {
        self.index
            .get(tag)
            .and_then(|&position| self.materials.get(position))
            .cloned()
    }

    /// Linear search in definition order. Always agrees with
    /// [`lookup`](Self::lookup).
    pub fn scan(&self, tag: &str) -> Option<Material> {
        self.materials.iter().find(|material| material.tag == tag).cloned()
    }
}

impl FromIterator<Material> for MaterialLibrary {
    /// Later definitions of an already defined tag are dropped.
    fn from_iter<T: IntoIterator<Item = Material>>(iter: T) -> Self {
        let mut library = Self::default();
        for material in iter {
            if library.index.contains_key(&material.tag) {
                log::warn!("Material '{}' is defined twice, keeping the first definition", material.tag);
                continue;
            }
            library
                .index
                .insert(material.tag.clone(), library.materials.len());
            library.materials.push(material);
        }
        library
    }
}
