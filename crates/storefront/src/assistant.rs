//! Rule-based shopping assistant.
//!
//! A reply is chosen by walking an ordered rule list against the lower-cased
//! message; the first rule whose predicate holds answers. Some predicates
//! also look at the visitor's recent messages so a follow-up such as "what
//! sizes?" is read in the context of an earlier "my baby needs shoes".
//! Catalog-aware rules summarize the products currently loaded.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use rust_decimal::Decimal;

use baby_sneakers_core::{Category, Product};

use crate::catalog::price_range;

/// How many earlier turns count as context.
const CONTEXT_TURNS: usize = 5;

/// Turns a conversation keeps; older ones are dropped. Never below
/// `CONTEXT_TURNS`.
const MAX_TURNS: usize = 40;

/// Brand lookups list individual products up to this many matches.
const LIST_LIMIT: usize = 3;

const GREETING: &str = "Hi! Welcome to Baby Sneakers. Ask me about sizes, brands, prices, shipping, or returns.";

const FALLBACK: &str = "I'm not sure about that one. Try asking about sizes, brands like Nike or Puma, prices, shipping, or returns, or use the contact form to reach our team.";

const COLORS: [&str; 16] = [
    "black", "white", "red", "blue", "green", "yellow", "orange", "purple", "pink", "gray",
    "grey", "navy", "brown", "tan", "beige", "silver",
];

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub text: String,
    pub from_assistant: bool,
}

/// What a rule sees.
struct Context<'a> {
    message: String,
    recent: Vec<String>,
    products: &'a [Product],
}

impl Context<'_> {
    fn says(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.message.contains(n))
    }

    /// Whole-word match, for short keywords that hide inside other words.
    fn says_word(&self, words: &[&str]) -> bool {
        self.message
            .split(|c: char| !c.is_alphanumeric())
            .any(|token| words.contains(&token))
    }

    fn recently_said(&self, needles: &[&str]) -> bool {
        self.recent
            .iter()
            .any(|text| needles.iter().any(|n| text.contains(n)))
    }

    fn about_sports(&self) -> bool {
        self.recently_said(&["sports", "running", "basketball", "soccer", "tennis"])
    }

    fn about_kids(&self) -> bool {
        self.recently_said(&["baby", "kids", "toddler"])
    }
}

type Predicate = Box<dyn Fn(&Context<'_>) -> bool + Send + Sync>;
type Responder = Box<dyn Fn(&Context<'_>) -> String + Send + Sync>;

struct Rule {
    matches: Predicate,
    respond: Responder,
}

fn rule(
    matches: impl Fn(&Context<'_>) -> bool + Send + Sync + 'static,
    respond: impl Fn(&Context<'_>) -> String + Send + Sync + 'static,
) -> Rule {
    Rule {
        matches: Box::new(matches),
        respond: Box::new(respond),
    }
}

fn canned(text: &'static str) -> impl Fn(&Context<'_>) -> String + Send + Sync + 'static {
    move |_| text.to_string()
}

struct Brand {
    name: &'static str,
    keywords: &'static [&'static str],
    blurb: &'static str,
}

static BRANDS: [Brand; 6] = [
    Brand {
        name: "Nike",
        keywords: &["nike"],
        blurb: "Nike brings Air cushioning and light knit uppers to little feet.",
    },
    Brand {
        name: "Jordan",
        keywords: &["jordan"],
        blurb: "Jordan minis carry the basketball heritage in crib-ready sizes.",
    },
    Brand {
        name: "Puma",
        keywords: &["puma"],
        blurb: "Puma makes playful, lightweight sneakers with soft soles.",
    },
    Brand {
        name: "Reebok",
        keywords: &["reebok"],
        blurb: "Reebok classics are comfy everyday shoes for first steps.",
    },
    Brand {
        name: "Timberland",
        keywords: &["timberland"],
        blurb: "Timberland builds sturdy little boots for outdoor adventures.",
    },
    Brand {
        name: "Converse",
        keywords: &["converse", "all star"],
        blurb: "Converse All Stars are timeless canvas sneakers in tiny sizes.",
    },
];

fn brand_products<'a>(brand: &Brand, products: &'a [Product]) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| {
            let name = p.name.to_lowercase();
            let description = p.description.to_lowercase();
            brand
                .keywords
                .iter()
                .any(|k| name.contains(k) || description.contains(k))
        })
        .collect()
}

fn brand_reply(brand: &Brand, products: &[Product]) -> String {
    let matches = brand_products(brand, products);
    let mut reply = String::from(brand.blurb);

    if matches.is_empty() {
        let _ = write!(
            reply,
            " We have no {} styles in stock right now; check back soon.",
            brand.name
        );
        return reply;
    }

    let prices: Vec<Decimal> = matches.iter().map(|p| p.price.amount()).collect();
    let total: Decimal = prices.iter().sum();
    let average = (total / Decimal::from(prices.len())).round_dp(2);
    let min = prices.iter().min().copied().unwrap_or_default();
    let max = prices.iter().max().copied().unwrap_or_default();
    let _ = write!(
        reply,
        " We have {} {} styles averaging ${average:.2} (from ${min:.2} to ${max:.2}).",
        matches.len(),
        brand.name
    );

    let colors: BTreeSet<&str> = matches
        .iter()
        .flat_map(|p| {
            let description = p.description.to_lowercase();
            COLORS
                .iter()
                .copied()
                .filter(move |c| description.contains(c))
        })
        .collect();
    if !colors.is_empty() {
        let listed: Vec<&str> = colors.iter().copied().take(5).collect();
        let more = if colors.len() > 5 { " and more" } else { "" };
        let _ = write!(reply, " Colors include {}{more}.", listed.join(", "));
    }

    let categories: BTreeSet<&str> = matches
        .iter()
        .filter_map(|p| p.category.map(|c: Category| c.as_str()))
        .collect();
    if !categories.is_empty() {
        let listed: Vec<&str> = categories.into_iter().collect();
        let _ = write!(reply, " Categories: {}.", listed.join(", "));
    }

    if matches.len() <= LIST_LIMIT {
        for product in matches {
            let _ = write!(reply, "\n- {}: {}", product.name, product.price);
        }
    }
    reply
}

fn catalog_price_reply(context: &Context<'_>) -> String {
    match price_range(context.products) {
        Some((min, max)) => format!(
            "Our {} styles range from {min} to {max}. Filter by price on the products page to narrow it down.",
            context.products.len()
        ),
        None => String::from(
            "Prices depend on the brand and style. New products are on the way, so check back soon.",
        ),
    }
}

fn catalog_overview_reply(context: &Context<'_>) -> String {
    let products = context.products;
    if products.is_empty() {
        return String::from("Our catalog is being restocked. Check back soon!");
    }
    let mut reply = format!("We currently carry {} styles.", products.len());
    if products.len() <= 5 {
        for product in products {
            let _ = write!(reply, "\n- {}: {}", product.name, product.price);
        }
    }
    reply
}

/// The rule list, in priority order.
fn rules() -> Vec<Rule> {
    let kids = ["baby", "kids", "children", "toddler"];

    let mut rules = vec![
        // Follow-ups that depend on what the visitor asked before.
        rule(
            |c| c.about_sports() && c.says(&["size"]),
            canned("Athletic fits vary by brand: Nike and Jordan run true to size, some Puma models run narrow. Leave a thumb's width at the toe."),
        ),
        rule(
            |c| c.about_kids() && c.says(&["size"]),
            canned("Measure both feet and pick the larger size. Roughly: 0-3 months size 1-2, 3-6 months 2-3, 6-9 months 3-4, 9-12 months 4-5, 12-18 months 5-6, 18-24 months 6-7."),
        ),
        rule(
            |c| (c.about_sports() || c.about_kids()) && c.says(&["color"]),
            canned("Little ones love bright colors, and soft pastels and neutrals are popular for babies. Most brands drop seasonal colorways too."),
        ),
        rule(
            |c| (c.about_sports() || c.about_kids()) && c.says(&["price", "cost"]),
            catalog_price_reply,
        ),
    ];

    rules.extend(BRANDS.iter().map(|brand| {
        rule(
            move |c| c.says(brand.keywords),
            move |c| brand_reply(brand, c.products),
        )
    }));

    rules.extend([
        rule(
            move |c| c.says(&kids) && c.says(&["size"]),
            canned("Measure both feet and pick the larger size, then leave a thumb's width of growing room. Kids grow fast, so re-measure every couple of months."),
        ),
        rule(
            move |c| c.says(&kids),
            canned("For babies and toddlers look for flexible soles, good arch support, and breathable materials. What age are you shopping for?"),
        ),
        rule(
            |c| c.says(&["available", "stock"]),
            canned("Everything on the products page is in stock. For a specific size, reach our team through the contact form."),
        ),
        rule(
            |c| c.says(&["size", "sizing"]),
            canned("Each product lists its shoe size, and you can filter by size on the products page. When in doubt, size up half a size."),
        ),
        rule(
            |c| c.says(&["color"]),
            canned("Colors vary by style; each product description lists them."),
        ),
        rule(
            |c| c.says(&["price", "cost", "expensive", "cheap"]),
            catalog_price_reply,
        ),
        rule(
            |c| c.says(&["shipping", "delivery"]),
            canned("Shipping is free on orders over $100. Standard delivery takes 3-5 business days, express 1-2."),
        ),
        rule(
            |c| c.says(&["return", "refund"]),
            canned("Unworn items can be returned within 30 days in their original packaging. Refunds land within 5-7 business days."),
        ),
        rule(
            |c| c.says(&["support", "help", "contact"]),
            canned("Our team is happy to help. Send us a message through the contact form and we'll get back to you."),
        ),
        rule(
            |c| c.says(&["compare", "better"]) || c.says_word(&["vs"]),
            canned("Nike and Jordan lead on cushioning, Puma and Reebok on lightweight comfort, Timberland on durability, and Converse on classic style."),
        ),
        rule(|c| c.says_word(&["hello", "hi", "hey"]), canned(GREETING)),
        rule(
            |c| c.says(&["thank"]),
            canned("You're welcome! Happy shopping at Baby Sneakers."),
        ),
        rule(|c| c.says(&["product"]), catalog_overview_reply),
    ]);

    rules
}

/// The assistant: an ordered rule list with a fallback reply.
pub struct Assistant {
    rules: Vec<Rule>,
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("rules", &self.rules.len())
            .finish()
    }
}

impl Default for Assistant {
    fn default() -> Self {
        Self { rules: rules() }
    }
}

impl Assistant {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening line shown before the visitor says anything.
    #[must_use]
    pub const fn greeting() -> &'static str {
        GREETING
    }

    /// Reply to `message`, given the earlier turns and the loaded catalog.
    #[must_use]
    pub fn reply(&self, message: &str, history: &[Turn], products: &[Product]) -> String {
        let recent = history
            .iter()
            .rev()
            .take(CONTEXT_TURNS)
            .filter(|turn| !turn.from_assistant)
            .map(|turn| turn.text.to_lowercase())
            .collect();
        let context = Context {
            message: message.to_lowercase(),
            recent,
            products,
        };

        self.rules
            .iter()
            .find(|rule| (rule.matches)(&context))
            .map_or_else(|| String::from(FALLBACK), |rule| (rule.respond)(&context))
    }
}

/// A running conversation with the assistant.
#[derive(Debug, Default)]
pub struct Conversation {
    assistant: Assistant,
    turns: Vec<Turn>,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Record the visitor's message and the assistant's reply, returning the
    /// reply.
    pub fn send(&mut self, message: &str, products: &[Product]) -> &str {
        let reply = self.assistant.reply(message, &self.turns, products);
        self.turns.push(Turn {
            text: message.to_string(),
            from_assistant: false,
        });
        self.turns.push(Turn {
            text: reply,
            from_assistant: true,
        });
        if let Some(excess) = self.turns.len().checked_sub(MAX_TURNS) {
            self.turns.drain(..excess);
        }
        self.turns
            .last()
            .map_or(FALLBACK, |turn| turn.text.as_str())
    }
}
