use tracing::info;

use crate::db::{Collection, Database};
use crate::error::{PosError, Result};
use crate::inventory;
use crate::models::{MaterialInput, RawMaterial};

use super::new_id;

fn validate(input: &MaterialInput) -> Result<()> {
    if input.name.trim().is_empty() || input.supplier.trim().is_empty() {
        return Err(PosError::validation("Material name and supplier are required"));
    }
    if !input.stock.is_finite() || !input.min_stock.is_finite() || !input.price.is_finite() {
        return Err(PosError::validation("Stock, minimum stock and price must be numbers"));
    }
    Ok(())
}

pub fn get_materials(db: &Database) -> Result<Vec<RawMaterial>> {
    db.load(Collection::RawMaterials)
}

pub fn get_material(db: &Database, id: &str) -> Result<RawMaterial> {
    get_materials(db)?
        .into_iter()
        .find(|m| m.id == id)
        .ok_or_else(|| PosError::not_found("Material", id))
}

pub fn create_material(db: &Database, input: MaterialInput) -> Result<RawMaterial> {
    validate(&input)?;

    let material = RawMaterial {
        id: new_id(),
        name: input.name.trim().to_string(),
        unit: input.unit,
        stock: input.stock,
        min_stock: input.min_stock,
        price: input.price,
        supplier: input.supplier.trim().to_string(),
    };

    db.update(Collection::RawMaterials, |materials: &mut Vec<RawMaterial>| {
        materials.push(material.clone());
        Ok(())
    })?;

    info!(id = %material.id, name = %material.name, "material created");
    Ok(material)
}

pub fn update_material(db: &Database, id: &str, input: MaterialInput) -> Result<RawMaterial> {
    validate(&input)?;

    db.update(Collection::RawMaterials, |materials: &mut Vec<RawMaterial>| {
        let material = materials
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PosError::not_found("Material", id))?;

        material.name = input.name.trim().to_string();
        material.unit = input.unit;
        material.stock = input.stock;
        material.min_stock = input.min_stock;
        material.price = input.price;
        material.supplier = input.supplier.trim().to_string();

        Ok(material.clone())
    })
}

/// Recipes that still reference the material are left as they are; the
/// stale lines are skipped during deduction.
pub fn delete_material(db: &Database, id: &str) -> Result<()> {
    db.update(Collection::RawMaterials, |materials: &mut Vec<RawMaterial>| {
        let before = materials.len();
        materials.retain(|m| m.id != id);
        if materials.len() == before {
            return Err(PosError::not_found("Material", id));
        }
        Ok(())
    })?;

    info!(id, "material deleted");
    Ok(())
}

pub fn get_low_stock(db: &Database) -> Result<Vec<RawMaterial>> {
    Ok(inventory::low_stock(&get_materials(db)?))
}
