use tracing::{info, warn};

use crate::db::{Collection, Database};
use crate::error::{PosError, Result};
use crate::inventory::{self, MenuCosting};
use crate::models::{MenuItem, MenuItemInput, RawMaterial};
use crate::search;

use super::new_id;

fn validate(input: &MenuItemInput, materials: &[RawMaterial]) -> Result<()> {
    if input.name.trim().is_empty() || input.price.is_nan() || input.price <= 0.0 {
        return Err(PosError::validation("Menu name and a price above zero are required"));
    }
    if input.recipe.is_empty() {
        return Err(PosError::validation("Recipe needs at least one ingredient"));
    }
    if input.recipe.iter().any(|line| line.quantity.is_nan() || line.quantity < 0.0) {
        return Err(PosError::validation("Recipe quantities cannot be negative"));
    }
    for line in &input.recipe {
        if !materials.iter().any(|m| m.id == line.material_id) {
            // Allowed: deduction skips unknown materials.
            warn!(material_id = %line.material_id, "recipe references unknown material");
        }
    }
    Ok(())
}

pub fn get_menu_items(db: &Database) -> Result<Vec<MenuItem>> {
    db.load(Collection::MenuItems)
}

/// Items offered at the till.
pub fn get_active_menu_items(db: &Database) -> Result<Vec<MenuItem>> {
    Ok(get_menu_items(db)?
        .into_iter()
        .filter(|m| m.is_active)
        .collect())
}

pub fn get_menu_item(db: &Database, id: &str) -> Result<MenuItem> {
    get_menu_items(db)?
        .into_iter()
        .find(|m| m.id == id)
        .ok_or_else(|| PosError::not_found("Menu item", id))
}

pub fn create_menu_item(db: &Database, input: MenuItemInput) -> Result<MenuItem> {
    let materials: Vec<RawMaterial> = db.load(Collection::RawMaterials)?;
    validate(&input, &materials)?;

    let item = MenuItem {
        id: new_id(),
        name: input.name.trim().to_string(),
        category: input.category,
        price: input.price,
        recipe: input.recipe,
        is_active: input.is_active,
    };

    db.update(Collection::MenuItems, |items: &mut Vec<MenuItem>| {
        items.push(item.clone());
        Ok(())
    })?;

    info!(id = %item.id, name = %item.name, "menu item created");
    Ok(item)
}

pub fn update_menu_item(db: &Database, id: &str, input: MenuItemInput) -> Result<MenuItem> {
    let materials: Vec<RawMaterial> = db.load(Collection::RawMaterials)?;
    validate(&input, &materials)?;

    db.update(Collection::MenuItems, |items: &mut Vec<MenuItem>| {
        let item = items
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PosError::not_found("Menu item", id))?;

        item.name = input.name.trim().to_string();
        item.category = input.category;
        item.price = input.price;
        item.recipe = input.recipe;
        item.is_active = input.is_active;

        Ok(item.clone())
    })
}

pub fn delete_menu_item(db: &Database, id: &str) -> Result<()> {
    db.update(Collection::MenuItems, |items: &mut Vec<MenuItem>| {
        let before = items.len();
        items.retain(|m| m.id != id);
        if items.len() == before {
            return Err(PosError::not_found("Menu item", id));
        }
        Ok(())
    })?;

    info!(id, "menu item deleted");
    Ok(())
}

pub fn toggle_menu_item(db: &Database, id: &str) -> Result<MenuItem> {
    db.update(Collection::MenuItems, |items: &mut Vec<MenuItem>| {
        let item = items
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PosError::not_found("Menu item", id))?;
        item.is_active = !item.is_active;
        Ok(item.clone())
    })
}

pub fn search_menu(db: &Database, term: &str) -> Result<Vec<MenuItem>> {
    Ok(search::search_menu(&get_menu_items(db)?, term))
}

pub fn get_menu_costing(db: &Database) -> Result<Vec<MenuCosting>> {
    let materials: Vec<RawMaterial> = db.load(Collection::RawMaterials)?;
    Ok(get_menu_items(db)?
        .iter()
        .map(|item| inventory::cost_menu_item(item, &materials))
        .collect())
}
