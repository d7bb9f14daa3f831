use crate::product::Product;

/// Case-insensitive text match over name, description, ingredients and `#id`.
/// A blank query matches everything.
pub fn matches_query(product: &Product, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    let id = format!("#{}", product.id);
    let hit = [
        Some(product.name.as_str()),
        product.description.as_deref(),
        product.ingredients.as_deref(),
        Some(id.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&query));
    hit
}

pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    products.iter().filter(|p| matches_query(p, query)).collect()
}
