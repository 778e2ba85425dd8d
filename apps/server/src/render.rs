//! # Recipe Page Rendering
//!
//! `GET /recipe/{id}` returns a standalone HTML page. The page layout is
//! behind [`RecipePageRenderer`] so the HTTP layer only loads data.
//!
//! ## Page Layout
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ ← Back to Inventory                      │
//! │ # Name                                   │
//! │ description                              │
//! │ Servings │ Prep │ Cook │ Total           │
//! │ ## Ingredients                           │
//! │ [availability banner]                    │
//! │  ✓ 2 cups Flour   ✗ 1 Egg (beaten)       │
//! │ ## Instructions                          │
//! │  1. ... 2. ...                           │
//! │                                     [★]  │
//! └──────────────────────────────────────────┘
//! ```

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use pantry_core::{Availability, InventoryIndex, Recipe, RecipeIngredient};

/// Turns a recipe and the current stock into a full HTML document.
pub trait RecipePageRenderer: Send + Sync {
    fn render(&self, recipe: &Recipe, inventory: &InventoryIndex) -> String;
}

/// The built-in page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRecipePage;

const PLACEHOLDER: &str = "—";

const STYLE: &str = r#"
:root { --bg: #faf9f7; --text: #1a1a1a; --muted: #666; --accent: #c45c26; --ok: #3fb950; --bad: #f85149; --line: #e5e3df; }
* { box-sizing: border-box; margin: 0; padding: 0; }
body { font-family: system-ui, sans-serif; background: var(--bg); color: var(--text); line-height: 1.7; max-width: 680px; margin: 0 auto; padding: 2rem 1rem 5rem; }
.back-link { color: var(--muted); text-decoration: none; font-size: 0.875rem; display: inline-block; margin-bottom: 2rem; }
.back-link:hover { color: var(--accent); }
h1 { font-family: Georgia, serif; font-size: 2.5rem; line-height: 1.2; margin-bottom: 0.5rem; }
h2 { font-family: Georgia, serif; color: var(--accent); margin: 2rem 0 1rem; }
.description { color: var(--muted); font-size: 1.1rem; margin-bottom: 1.5rem; }
.meta { display: flex; flex-wrap: wrap; gap: 2rem; padding: 1rem 0; border-top: 1px solid var(--line); border-bottom: 1px solid var(--line); }
.meta-item { display: flex; flex-direction: column; }
.meta-label { font-size: 0.75rem; text-transform: uppercase; color: var(--muted); }
.meta-value { font-size: 1.125rem; font-weight: 500; }
.availability-banner { padding: 0.75rem 1rem; border-radius: 8px; margin-bottom: 1rem; display: flex; justify-content: space-between; flex-wrap: wrap; gap: 0.5rem; }
.availability-banner.complete { background: rgba(63, 185, 80, 0.15); color: var(--ok); }
.availability-banner.partial { background: rgba(210, 153, 34, 0.15); color: #bf8a1f; }
.add-missing-btn { background: var(--accent); color: #fff; border: none; padding: 0.5rem 1rem; border-radius: 6px; cursor: pointer; }
.add-missing-btn:disabled { opacity: 0.5; cursor: not-allowed; }
.ingredients { background: #fff; border: 1px solid var(--line); border-radius: 12px; padding: 1.5rem; }
.ingredients ul { list-style: none; }
.ingredients li { padding: 0.5rem 0; border-bottom: 1px solid var(--line); }
.ingredients li:last-child { border-bottom: none; }
.ingredients li.available .status-icon { color: var(--ok); }
.ingredients li.missing .status-icon { color: var(--bad); }
.ingredients li.missing { opacity: 0.7; }
.notes { color: var(--muted); font-size: 0.9rem; }
.steps ol { padding-left: 1.5rem; }
.steps li { padding: 0.75rem 0 0.75rem 0.5rem; }
.favorite { position: fixed; bottom: 2rem; right: 2rem; width: 56px; height: 56px; border-radius: 50%; border: 2px solid var(--accent); font-size: 1.5rem; cursor: pointer; background: #fff; color: var(--accent); }
.favorite.on { background: var(--accent); color: #fff; }
"#;

const SCRIPT: &str = r#"
async function toggleFavorite() {
    await fetch(`/api/recipes/${recipeId}/favorite`, { method: 'POST' });
    location.reload();
}

async function addMissingToGrocery() {
    const btn = document.querySelector('.add-missing-btn');
    btn.disabled = true;
    btn.textContent = 'Adding...';
    for (const name of missingIngredients) {
        try {
            const res = await fetch(`/api/search?q=${encodeURIComponent(name)}`);
            const items = await res.json();
            const match = items.find(i => i.name.toLowerCase() === name.toLowerCase());
            if (match) {
                await fetch(`/api/items/${match.id}/to-grocery`, { method: 'POST' });
            } else {
                await fetch('/api/items', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ name, location: 'grocery_list' })
                });
            }
        } catch (err) {
            console.error(`Failed to add ${name}:`, err);
        }
    }
    btn.textContent = '✓ Added to grocery';
    setTimeout(() => location.reload(), 1000);
}
"#;

fn minutes(value: Option<i64>) -> String {
    match value {
        Some(m) if m > 0 => format!("{} min", m),
        _ => PLACEHOLDER.to_string(),
    }
}

/// JSON safe to embed inside a `<script>` element.
fn script_json(values: &[String]) -> String {
    serde_json::to_string(values)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

fn ingredient_line(out: &mut String, ingredient: &RecipeIngredient, in_stock: bool) {
    let (class, icon) = if in_stock {
        ("available", "✓")
    } else {
        ("missing", "✗")
    };

    let _ = write!(out, "<li class=\"{class}\"><span class=\"status-icon\">{icon}</span> ");
    for part in [&ingredient.amount, &ingredient.unit].into_iter().flatten() {
        let _ = write!(out, "{} ", encode_text(part));
    }
    let _ = write!(out, "{}", encode_text(&ingredient.name));
    if let Some(notes) = &ingredient.notes {
        let _ = write!(out, " <span class=\"notes\">({})</span>", encode_text(notes));
    }
    out.push_str("</li>\n");
}

fn banner(availability: &Availability) -> String {
    if availability.total == 0 {
        String::new()
    } else if availability.is_complete() {
        format!(
            "<div class=\"availability-banner complete\">✓ All {} ingredients in stock!</div>",
            availability.total
        )
    } else {
        format!(
            "<div class=\"availability-banner partial\">\
             <span>◐ {}/{} ingredients in stock</span>\
             <button class=\"add-missing-btn\" onclick=\"addMissingToGrocery()\">🛒 Add {} missing to grocery</button>\
             </div>",
            availability.available.len(),
            availability.total,
            availability.missing.len()
        )
    }
}

impl RecipePageRenderer for HtmlRecipePage {
    fn render(&self, recipe: &Recipe, inventory: &InventoryIndex) -> String {
        let availability = Availability::of(&recipe.ingredients, inventory);
        let name = encode_text(&recipe.name);

        let mut ingredients = String::new();
        for ingredient in &recipe.ingredients {
            ingredient_line(&mut ingredients, ingredient, inventory.contains(ingredient));
        }

        let mut steps = String::new();
        for step in recipe.ordered_steps() {
            let _ = writeln!(steps, "<li>{}</li>", encode_text(&step.instruction));
        }

        let description = recipe
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!("<p class=\"description\">{}</p>", encode_text(d)))
            .unwrap_or_default();

        let total = recipe.total_time_minutes();
        let (favorite_class, favorite_icon, favorite_title) = if recipe.is_favorite {
            ("favorite on", "★", "Remove from favorites")
        } else {
            ("favorite", "☆", "Add to favorites")
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{name}</title>
<style>{STYLE}</style>
</head>
<body>
<a href="/" class="back-link">← Back to Inventory</a>
<h1>{name}</h1>
{description}
<div class="meta">
<div class="meta-item"><span class="meta-label">Servings</span><span class="meta-value">{servings}</span></div>
<div class="meta-item"><span class="meta-label">Prep</span><span class="meta-value">{prep}</span></div>
<div class="meta-item"><span class="meta-label">Cook</span><span class="meta-value">{cook}</span></div>
<div class="meta-item"><span class="meta-label">Total</span><span class="meta-value">{total}</span></div>
</div>
<h2>Ingredients</h2>
{banner}
<div class="ingredients"><ul>
{ingredients}</ul></div>
<h2>Instructions</h2>
<div class="steps"><ol>
{steps}</ol></div>
<button class="{favorite_class}" onclick="toggleFavorite()" title="{favorite_title}">{favorite_icon}</button>
<script>
const recipeId = {id};
const missingIngredients = {missing};
{SCRIPT}
</script>
</body>
</html>
"#,
            servings = recipe.servings,
            prep = minutes(recipe.prep_time_minutes),
            cook = minutes(recipe.cook_time_minutes),
            total = minutes(Some(total)),
            banner = banner(&availability),
            favorite_title = encode_double_quoted_attribute(favorite_title),
            id = recipe.id,
            missing = script_json(&availability.missing),
        )
    }
}
