use crate::entities::{Advertiser, Category, Publisher};

/// Ages are clamped to this window before normalization
const AGE_MIN: f64 = 10.0;
const AGE_MAX: f64 = 65.0;

/// Budget normalization ceiling; budgets at or above it saturate to 1
const BUDGET_CEILING: f64 = 100_000.0;

/// Feature vector component weights
const AGE_COMPONENT_WEIGHT: f64 = 0.9;
const BUDGET_COMPONENT_WEIGHT: f64 = 0.4;
const AUTHORITY_COMPONENT_WEIGHT: f64 = 0.6;

/// Age-similarity term reaches 0 at this many years of difference
const AGE_SIMILARITY_RANGE: f64 = 40.0;

/// Blend weights for the base score
const COSINE_WEIGHT: f64 = 0.7;
const AGE_SIMILARITY_WEIGHT: f64 = 0.2;
const AUTHORITY_BLEND_WEIGHT: f64 = 0.1;

/// Contextual adjustment rules applied multiplicatively on top of the base
/// score. Rules are keyed by semantic flags on the entities (dominant,
/// inappropriate_audience) rather than literal identifiers, so the rule
/// table stays data-driven and testable in isolation.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub enum ContextRule {
    /// Dominant advertisers get a boost on their preferred category and a
    /// heavy context-inappropriate-placement penalty everywhere else
    DOMINANT_PLACEMENT { on_preferred: f64, off_preferred: f64 },
    /// Penalize a sensitive advertiser category on young or flagged outlets
    SENSITIVE_AUDIENCE {
        advertiser_category: Category,
        max_audience_age: f64,
        penalty: f64,
    },
    /// Mild penalty for a specific advertiser/publisher category pairing
    CATEGORY_FRICTION {
        advertiser_category: Category,
        publisher_category: Category,
        penalty: f64,
    },
}

impl ContextRule {
    /// Multiplier this rule contributes for the given pair (1.0 when the
    /// rule does not apply). Rules are independent of each other.
    fn multiplier(&self, advertiser: &Advertiser, publisher: &Publisher) -> f64 {
        match self {
            ContextRule::DOMINANT_PLACEMENT { on_preferred, off_preferred } => {
                if advertiser.dominant {
                    if publisher.category == advertiser.preferred_category {
                        *on_preferred
                    } else {
                        *off_preferred
                    }
                } else {
                    1.0
                }
            }
            ContextRule::SENSITIVE_AUDIENCE {
                advertiser_category,
                max_audience_age,
                penalty,
            } => {
                if advertiser.category == *advertiser_category
                    && (publisher.inappropriate_audience || publisher.audience_age <= *max_audience_age)
                {
                    *penalty
                } else {
                    1.0
                }
            }
            ContextRule::CATEGORY_FRICTION {
                advertiser_category,
                publisher_category,
                penalty,
            } => {
                if advertiser.category == *advertiser_category
                    && publisher.category == *publisher_category
                {
                    *penalty
                } else {
                    1.0
                }
            }
        }
    }
}

/// Deterministic compatibility scorer between one advertiser and one
/// publisher. Pure and order-independent of the candidate set: the score
/// depends only on the single pair (and the fixed rule table).
pub struct AffinityModel {
    pub rules: Vec<ContextRule>,
}

impl AffinityModel {
    /// Create a model with the standard contextual rule table:
    /// dominant placement (1.1 / 0.25), sensitive Living/Health audiences
    /// (age <= 14 or flagged outlets, 0.3), Fashion/Shop on Living/Health
    /// friction (0.7)
    pub fn standard() -> Self {
        Self {
            rules: vec![
                ContextRule::DOMINANT_PLACEMENT {
                    on_preferred: 1.1,
                    off_preferred: 0.25,
                },
                ContextRule::SENSITIVE_AUDIENCE {
                    advertiser_category: Category::LivingHealth,
                    max_audience_age: 14.0,
                    penalty: 0.3,
                },
                ContextRule::CATEGORY_FRICTION {
                    advertiser_category: Category::FashionShop,
                    publisher_category: Category::LivingHealth,
                    penalty: 0.7,
                },
            ],
        }
    }

    /// Create a model with a custom rule table
    pub fn with_rules(rules: Vec<ContextRule>) -> Self {
        Self { rules }
    }

    /// Compatibility score in [0, 100] for one advertiser/publisher pair
    pub fn affinity(&self, advertiser: &Advertiser, publisher: &Publisher) -> f64 {
        let base = self.base_affinity01(advertiser, publisher);
        let mut multiplier = 1.0;
        for rule in &self.rules {
            multiplier *= rule.multiplier(advertiser, publisher);
        }
        (base * multiplier).clamp(0.0, 1.0) * 100.0
    }

    /// Blended base score in [0, 1] before contextual adjustment
    fn base_affinity01(&self, advertiser: &Advertiser, publisher: &Publisher) -> f64 {
        let advertiser_vector = build_advertiser_vector(advertiser);
        let publisher_vector = build_publisher_vector(publisher);
        let cosine = cosine_similarity(&advertiser_vector, &publisher_vector);

        let age_diff = (advertiser.target_age - publisher.audience_age).abs();
        let age_similarity = (1.0 - age_diff / AGE_SIMILARITY_RANGE).max(0.0);

        let blend = COSINE_WEIGHT * cosine
            + AGE_SIMILARITY_WEIGHT * age_similarity
            + AUTHORITY_BLEND_WEIGHT * publisher.authority;
        blend.clamp(0.0, 1.0)
    }
}

/// Clamp an age to [AGE_MIN, AGE_MAX] and map it linearly to [0, 1]
fn normalize_age(age: f64) -> f64 {
    (age.clamp(AGE_MIN, AGE_MAX) - AGE_MIN) / (AGE_MAX - AGE_MIN)
}

/// Feature vector for the demand side: weighted normalized age, one-hot
/// category block, weighted normalized budget
fn build_advertiser_vector(advertiser: &Advertiser) -> [f64; 5] {
    let age = normalize_age(advertiser.target_age);
    let [c1, c2, c3] = advertiser.category.one_hot();
    let budget_norm = (advertiser.budget / BUDGET_CEILING).min(1.0);
    [age * AGE_COMPONENT_WEIGHT, c1, c2, c3, budget_norm * BUDGET_COMPONENT_WEIGHT]
}

/// Feature vector for the supply side: weighted normalized age, one-hot
/// category block, weighted authority
fn build_publisher_vector(publisher: &Publisher) -> [f64; 5] {
    let age = normalize_age(publisher.audience_age);
    let [c1, c2, c3] = publisher.category.one_hot();
    [age * AGE_COMPONENT_WEIGHT, c1, c2, c3, publisher.authority * AUTHORITY_COMPONENT_WEIGHT]
}

fn dot(a: &[f64; 5], b: &[f64; 5]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Cosine similarity, defined as 0 when either vector has zero magnitude
/// so the score is never NaN
fn cosine_similarity(a: &[f64; 5], b: &[f64; 5]) -> f64 {
    let denom = dot(a, a).sqrt() * dot(b, b).sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot(a, b) / denom
    }
}

/// Compatibility score in [0, 100] using the standard contextual rule table
pub fn affinity(advertiser: &Advertiser, publisher: &Publisher) -> f64 {
    AffinityModel::standard().affinity(advertiser, publisher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::age_range;

    fn advertiser(category: Category, target_age: f64, budget: f64, bid: f64) -> Advertiser {
        Advertiser {
            advertiser_id: 0,
            advertiser_name: "Test Advertiser".to_string(),
            category,
            target_age,
            target_age_range: age_range(target_age),
            budget,
            bid,
            dominant: false,
            preferred_category: category,
        }
    }

    fn publisher(category: Category, audience_age: f64, authority: f64) -> Publisher {
        Publisher {
            publisher_id: 0,
            publisher_name: "Test Publisher".to_string(),
            category,
            audience_age,
            audience_age_range: age_range(audience_age),
            authority,
            inappropriate_audience: false,
        }
    }

    #[test]
    fn test_affinity_within_bounds() {
        let model = AffinityModel::standard();
        let categories = [Category::LivingHealth, Category::HobbyFun, Category::FashionShop];
        for &ac in &categories {
            for &pc in &categories {
                let a = advertiser(ac, 35.0, 5_000.0, 30.0);
                let p = publisher(pc, 22.0, 0.9);
                let score = model.affinity(&a, &p);
                assert!((0.0..=100.0).contains(&score), "score {} out of bounds", score);
                assert!(!score.is_nan());
            }
        }
    }

    #[test]
    fn test_affinity_is_pure() {
        let model = AffinityModel::standard();
        let a = advertiser(Category::HobbyFun, 18.0, 3_000.0, 40.0);
        let p = publisher(Category::HobbyFun, 16.0, 0.8);
        assert_eq!(model.affinity(&a, &p), model.affinity(&a, &p));
    }

    #[test]
    fn test_matching_category_scores_higher() {
        let model = AffinityModel::standard();
        let a = advertiser(Category::HobbyFun, 22.0, 3_000.0, 40.0);
        let same = publisher(Category::HobbyFun, 22.0, 0.8);
        let other = publisher(Category::LivingHealth, 22.0, 0.8);
        assert!(model.affinity(&a, &same) > model.affinity(&a, &other));
    }

    #[test]
    fn test_dominant_placement_penalty() {
        let model = AffinityModel::standard();
        let mut whale = advertiser(Category::FashionShop, 25.0, 100_000.0, 150.0);
        whale.dominant = true;

        let on_category = publisher(Category::FashionShop, 34.0, 0.9);
        let off_category = publisher(Category::HobbyFun, 26.0, 0.9);

        let mut plain = whale.clone();
        plain.dominant = false;

        // Off the preferred category the whale is crushed relative to the
        // same advertiser without the dominant flag
        assert!(model.affinity(&whale, &off_category) < model.affinity(&plain, &off_category) * 0.3);
        // On the preferred category the flag boosts the score
        assert!(model.affinity(&whale, &on_category) >= model.affinity(&plain, &on_category));
    }

    #[test]
    fn test_sensitive_audience_penalty() {
        let model = AffinityModel::standard();
        let pharma = advertiser(Category::LivingHealth, 55.0, 2_000.0, 35.0);

        let young = publisher(Category::HobbyFun, 12.0, 0.3);
        let mut flagged = publisher(Category::HobbyFun, 30.0, 0.3);
        flagged.inappropriate_audience = true;
        let adult = publisher(Category::HobbyFun, 48.0, 0.3);

        assert!(model.affinity(&pharma, &young) < model.affinity(&pharma, &adult));
        // The flag triggers the penalty regardless of audience age
        let mut unflagged = flagged.clone();
        unflagged.inappropriate_audience = false;
        assert!(model.affinity(&pharma, &flagged) < model.affinity(&pharma, &unflagged));
    }

    #[test]
    fn test_category_friction_penalty() {
        let model = AffinityModel::standard();
        let fashion = advertiser(Category::FashionShop, 20.0, 1_500.0, 18.0);
        let health_outlet = publisher(Category::LivingHealth, 20.0, 0.8);
        let fun_outlet = publisher(Category::HobbyFun, 20.0, 0.8);

        let base_model = AffinityModel::with_rules(Vec::new());
        let with_rule = model.affinity(&fashion, &health_outlet) / 100.0;
        let without_rule = base_model.affinity(&fashion, &health_outlet) / 100.0;
        assert!((with_rule - without_rule * 0.7).abs() < 1e-9);
        // No friction rule for this pairing
        assert_eq!(model.affinity(&fashion, &fun_outlet), base_model.affinity(&fashion, &fun_outlet));
    }

    #[test]
    fn test_cosine_zero_magnitude_is_zero() {
        let zero = [0.0; 5];
        let v = [0.5, 1.0, 0.0, 0.0, 0.2];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_normalize_age_clamps() {
        assert_eq!(normalize_age(5.0), 0.0);
        assert_eq!(normalize_age(70.0), 1.0);
        assert!((normalize_age(37.5) - 0.5).abs() < 1e-9);
    }
}
