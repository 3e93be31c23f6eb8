use std::sync::{Arc, OnceLock};

use usvg::fontdb::{Database, Family, ID, Query, Stretch, Style, Weight};

use crate::scene::measure::TextStyle;

// Generic families are mapped to the first installed entry; fontdb's own defaults
// (Courier New, Arial, Times New Roman) are rarely present outside Windows and macOS.
const MONOSPACE_FAMILIES: &[&str] = &[
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "Menlo",
    "Consolas",
    "Courier New",
];
const SANS_SERIF_FAMILIES: &[&str] = &[
    "Inter",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
];
const SERIF_FAMILIES: &[&str] = &[
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "Times New Roman",
];

/// Process-wide system font database, loaded on first use.
pub fn system_fontdb() -> Arc<Database> {
    static DB: OnceLock<Arc<Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        assign_generic_families(&mut db);
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Arc::new(db)
    })
    .clone()
}

fn assign_generic_families(db: &mut Database) {
    let monospace = first_installed(db, MONOSPACE_FAMILIES).or_else(|| {
        db.faces()
            .find(|f| f.monospaced)
            .and_then(|f| f.families.first())
            .map(|(name, _)| name.clone())
    });
    if let Some(name) = monospace {
        db.set_monospace_family(name);
    }
    if let Some(name) = first_installed(db, SANS_SERIF_FAMILIES) {
        db.set_sans_serif_family(name);
    }
    if let Some(name) = first_installed(db, SERIF_FAMILIES) {
        db.set_serif_family(name);
    }
}

fn first_installed(db: &Database, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find(|name| {
            db.faces()
                .any(|f| f.families.iter().any(|(family, _)| family.as_str() == **name))
        })
        .map(|name| (*name).to_owned())
}

/// Family list for `style`: its own family, then the generic fallbacks.
pub fn style_families(style: &TextStyle) -> Vec<Family<'_>> {
    let own = match style.font_family.as_str() {
        "monospace" => Family::Monospace,
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        name => Family::Name(name),
    };
    let mut families = vec![own];
    push_fallbacks(&mut families);
    families
}

fn push_fallbacks(families: &mut Vec<Family<'_>>) {
    families.push(Family::SansSerif);
    families.push(Family::Serif);
    families.push(Family::Monospace);
}

/// Weight `style` is drawn with.
pub fn style_weight(style: &TextStyle) -> Weight {
    if style.bold {
        Weight::BOLD
    } else {
        Weight::NORMAL
    }
}

/// Best face for `families`; any face at all when none of them is installed.
pub fn select_face(
    db: &Database,
    families: &[Family<'_>],
    weight: Weight,
    stretch: Stretch,
    style: Style,
) -> Option<ID> {
    let query = Query {
        families,
        weight,
        stretch,
        style,
    };
    db.query(&query).or_else(|| db.faces().next().map(|f| f.id))
}

/// Face `style` resolves to; the same face the rasterizer picks for it.
pub fn face_for_style(db: &Database, style: &TextStyle) -> Option<ID> {
    select_face(
        db,
        &style_families(style),
        style_weight(style),
        Stretch::Normal,
        Style::Normal,
    )
}

/// usvg font resolver that never leaves a `<text>` without a face.
pub fn svg_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => Family::Serif,
                    usvg::FontFamily::SansSerif => Family::SansSerif,
                    usvg::FontFamily::Cursive => Family::Cursive,
                    usvg::FontFamily::Fantasy => Family::Fantasy,
                    usvg::FontFamily::Monospace => Family::Monospace,
                    usvg::FontFamily::Named(s) => Family::Name(s),
                });
            }
            push_fallbacks(&mut families);

            let stretch = match font.stretch() {
                usvg::FontStretch::UltraCondensed => Stretch::UltraCondensed,
                usvg::FontStretch::ExtraCondensed => Stretch::ExtraCondensed,
                usvg::FontStretch::Condensed => Stretch::Condensed,
                usvg::FontStretch::SemiCondensed => Stretch::SemiCondensed,
                usvg::FontStretch::Normal => Stretch::Normal,
                usvg::FontStretch::SemiExpanded => Stretch::SemiExpanded,
                usvg::FontStretch::Expanded => Stretch::Expanded,
                usvg::FontStretch::ExtraExpanded => Stretch::ExtraExpanded,
                usvg::FontStretch::UltraExpanded => Stretch::UltraExpanded,
            };
            let style = match font.style() {
                usvg::FontStyle::Normal => Style::Normal,
                usvg::FontStyle::Italic => Style::Italic,
                usvg::FontStyle::Oblique => Style::Oblique,
            };

            select_face(fontdb, &families, Weight(font.weight()), stretch, style)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
