//! Recipe-driven stock movement and costing.
//!
//! Everything here works on in-memory slices; callers load and save the
//! collections around it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{MenuItem, RawMaterial, TransactionItem};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDeduction {
    pub material_id: String,
    pub material_name: String,
    pub amount: f64,
    pub remaining: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedIngredient {
    pub menu_id: String,
    pub material_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeductionReport {
    pub deducted: Vec<MaterialDeduction>,
    /// Menu ids that no longer exist in the catalog.
    pub skipped_items: Vec<String>,
    /// Recipe lines pointing at materials that no longer exist.
    pub skipped_ingredients: Vec<SkippedIngredient>,
}

impl DeductionReport {
    pub fn is_complete(&self) -> bool {
        self.skipped_items.is_empty() && self.skipped_ingredients.is_empty()
    }

    /// Total deducted from one material across the whole report.
    pub fn total_for(&self, material_id: &str) -> f64 {
        self.deducted
            .iter()
            .filter(|d| d.material_id == material_id)
            .map(|d| d.amount)
            .sum()
    }
}

/// Deduct the ingredients of `quantity` units of `menu_id` from `materials`.
///
/// Not atomic: a missing material skips only that ingredient, a missing menu
/// item skips the whole line. Stock is allowed to go negative.
pub fn deduct_for_sale(
    materials: &mut [RawMaterial],
    menu_items: &[MenuItem],
    menu_id: &str,
    quantity: u32,
    report: &mut DeductionReport,
) {
    let Some(menu) = menu_items.iter().find(|m| m.id == menu_id) else {
        warn!(menu_id, "sold item missing from catalog, stock not deducted");
        report.skipped_items.push(menu_id.to_string());
        return;
    };

    for line in &menu.recipe {
        match materials.iter_mut().find(|m| m.id == line.material_id) {
            Some(material) => {
                let amount = line.quantity * f64::from(quantity);
                material.stock -= amount;
                report.deducted.push(MaterialDeduction {
                    material_id: material.id.clone(),
                    material_name: material.name.clone(),
                    amount,
                    remaining: material.stock,
                });
            }
            None => {
                warn!(
                    menu_id,
                    material_id = %line.material_id,
                    "recipe references unknown material, ingredient skipped"
                );
                report.skipped_ingredients.push(SkippedIngredient {
                    menu_id: menu.id.clone(),
                    material_id: line.material_id.clone(),
                });
            }
        }
    }
}

/// Deduct stock for every line of a sale.
pub fn deduct_for_lines(
    materials: &mut [RawMaterial],
    menu_items: &[MenuItem],
    lines: &[TransactionItem],
) -> DeductionReport {
    let mut report = DeductionReport::default();
    for line in lines {
        deduct_for_sale(materials, menu_items, &line.menu_id, line.quantity, &mut report);
    }
    report
}

pub fn restock(material: &mut RawMaterial, quantity: f64) {
    material.stock += quantity;
}

/// Materials at or below their minimum, in catalog order.
pub fn low_stock(materials: &[RawMaterial]) -> Vec<RawMaterial> {
    materials
        .iter()
        .filter(|m| m.is_low_stock())
        .cloned()
        .collect()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MenuCosting {
    pub menu_id: String,
    pub name: String,
    pub price: f64,
    pub unit_cost: f64,
    pub margin: f64,
    pub margin_percent: f64,
    pub missing_materials: Vec<String>,
    /// Units current stock can still produce, if the recipe has any
    /// resolvable ingredient.
    pub producible_units: Option<u32>,
}

/// Ingredient cost of one unit of `menu`, priced at the materials' list
/// prices. Stale material references contribute nothing.
pub fn recipe_cost(menu: &MenuItem, materials: &[RawMaterial]) -> f64 {
    menu.recipe
        .iter()
        .filter_map(|line| {
            materials
                .iter()
                .find(|m| m.id == line.material_id)
                .map(|m| m.price * line.quantity)
        })
        .sum()
}

pub fn cost_menu_item(menu: &MenuItem, materials: &[RawMaterial]) -> MenuCosting {
    let unit_cost = recipe_cost(menu, materials);
    let margin = menu.price - unit_cost;
    let margin_percent = if menu.price > 0.0 {
        margin / menu.price * 100.0
    } else {
        0.0
    };
    let missing_materials = menu
        .recipe
        .iter()
        .filter(|line| !materials.iter().any(|m| m.id == line.material_id))
        .map(|line| line.material_id.clone())
        .collect();

    MenuCosting {
        menu_id: menu.id.clone(),
        name: menu.name.clone(),
        price: menu.price,
        unit_cost,
        margin,
        margin_percent,
        missing_materials,
        producible_units: producible_units(menu, materials),
    }
}

/// How many units of `menu` current stock can still produce.
pub fn producible_units(menu: &MenuItem, materials: &[RawMaterial]) -> Option<u32> {
    menu.recipe
        .iter()
        .filter(|line| line.quantity > 0.0)
        .filter_map(|line| {
            materials
                .iter()
                .find(|m| m.id == line.material_id)
                .map(|m| (m.stock / line.quantity).floor().max(0.0) as u32)
        })
        .min()
}
