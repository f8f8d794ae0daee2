/// Spread applied around a representative age to derive an age range
pub const AGE_SPREAD: f64 = 5.0;

/// Derive an age range as center ± AGE_SPREAD
pub fn age_range(age: f64) -> (f64, f64) {
    (age - AGE_SPREAD, age + AGE_SPREAD)
}

/// Closed set of content categories shared by both market sides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    LivingHealth,
    HobbyFun,
    FashionShop,
}

impl Category {
    /// One-hot encoding used as the category block of a feature vector
    pub fn one_hot(self) -> [f64; 3] {
        match self {
            Category::LivingHealth => [1.0, 0.0, 0.0],
            Category::HobbyFun => [0.0, 1.0, 0.0],
            Category::FashionShop => [0.0, 0.0, 1.0],
        }
    }

    /// Short human-readable label for logs and charts
    pub fn label(self) -> &'static str {
        match self {
            Category::LivingHealth => "Living/Health",
            Category::HobbyFun => "Hobby/Fun",
            Category::FashionShop => "Fashion/Shop",
        }
    }
}

/// Demand-side entity bidding for publisher exposure
///
/// Immutable once defined; the working set per run is an externally chosen
/// finite subset. Validation of fields (non-negative budget and bid) is owned
/// by the catalog layer, the engine assumes validated inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Advertiser {
    pub advertiser_id: usize,
    pub advertiser_name: String,
    pub category: Category,
    /// Representative target age (single value)
    pub target_age: f64,
    /// Target age range derived as target_age ± AGE_SPREAD
    pub target_age_range: (f64, f64),
    /// Total campaign budget (relative units)
    pub budget: f64,
    /// Bid unit price (CPM/CPC-like relative value)
    pub bid: f64,
    /// Configuration-level flag for distinguished high-budget entities
    /// subject to the dominant-placement context rule
    pub dominant: bool,
    /// Category this advertiser considers contextually appropriate,
    /// consulted only by the dominant-placement rule
    pub preferred_category: Category,
}

/// Supply-side entity offering exposure inventory
#[derive(Debug, Clone, PartialEq)]
pub struct Publisher {
    pub publisher_id: usize,
    pub publisher_name: String,
    pub category: Category,
    /// Average age of the main audience
    pub audience_age: f64,
    /// Audience age range derived as audience_age ± AGE_SPREAD
    pub audience_age_range: (f64, f64),
    /// Quality/trust signal in [0, 1]
    pub authority: f64,
    /// Configuration-level flag for outlets whose audience is unsuitable
    /// for sensitive ad categories
    pub inappropriate_audience: bool,
}

/// Container for advertisers with methods to add advertisers
/// IDs are automatically set to match the Vec index
pub struct Advertisers {
    pub advertisers: Vec<Advertiser>,
}

impl Advertisers {
    pub fn new() -> Self {
        Self {
            advertisers: Vec::new(),
        }
    }

    /// Add an advertiser to the collection
    ///
    /// # Arguments
    /// * `advertiser_name` - Name of the advertiser
    /// * `category` - Content category
    /// * `target_age` - Representative target age (range is derived)
    /// * `budget` - Total campaign budget
    /// * `bid` - Bid unit price
    pub fn add(&mut self, advertiser_name: String, category: Category, target_age: f64, budget: f64, bid: f64) {
        let advertiser_id = self.advertisers.len();
        self.advertisers.push(Advertiser {
            advertiser_id,
            advertiser_name,
            category,
            target_age,
            target_age_range: age_range(target_age),
            budget,
            bid,
            dominant: false,
            preferred_category: category,
        });
    }

    /// Add a pre-constructed advertiser (for dominant entities or custom
    /// preferred categories). The advertiser_id is overwritten to match the
    /// Vec index.
    pub fn add_advanced(&mut self, mut advertiser: Advertiser) {
        advertiser.advertiser_id = self.advertisers.len();
        self.advertisers.push(advertiser);
    }

    pub fn len(&self) -> usize {
        self.advertisers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advertisers.is_empty()
    }
}

impl Default for Advertisers {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for publishers with methods to add publishers
/// IDs are automatically set to match the Vec index
pub struct Publishers {
    pub publishers: Vec<Publisher>,
}

impl Publishers {
    pub fn new() -> Self {
        Self {
            publishers: Vec::new(),
        }
    }

    /// Add a publisher to the collection
    ///
    /// # Arguments
    /// * `publisher_name` - Name of the publisher
    /// * `category` - Content category
    /// * `audience_age` - Average audience age (range is derived)
    /// * `authority` - Quality/trust signal in [0, 1]
    pub fn add(&mut self, publisher_name: String, category: Category, audience_age: f64, authority: f64) {
        let publisher_id = self.publishers.len();
        self.publishers.push(Publisher {
            publisher_id,
            publisher_name,
            category,
            audience_age,
            audience_age_range: age_range(audience_age),
            authority,
            inappropriate_audience: false,
        });
    }

    /// Add a pre-constructed publisher (for inappropriate-audience outlets).
    /// The publisher_id is overwritten to match the Vec index.
    pub fn add_advanced(&mut self, mut publisher: Publisher) {
        publisher.publisher_id = self.publishers.len();
        self.publishers.push(publisher);
    }

    pub fn len(&self) -> usize {
        self.publishers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publishers.is_empty()
    }
}

impl Default for Publishers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut advertisers = Advertisers::new();
        advertisers.add("First".to_string(), Category::HobbyFun, 30.0, 1000.0, 25.0);
        advertisers.add("Second".to_string(), Category::FashionShop, 20.0, 1500.0, 18.0);
        assert_eq!(advertisers.advertisers[0].advertiser_id, 0);
        assert_eq!(advertisers.advertisers[1].advertiser_id, 1);
        assert_eq!(advertisers.advertisers[1].target_age_range, (15.0, 25.0));
    }

    #[test]
    fn test_add_advanced_overwrites_id() {
        let mut publishers = Publishers::new();
        publishers.add("News".to_string(), Category::LivingHealth, 52.0, 0.8);
        publishers.add_advanced(Publisher {
            publisher_id: 99,
            publisher_name: "FlashArcade".to_string(),
            category: Category::HobbyFun,
            audience_age: 12.0,
            audience_age_range: age_range(12.0),
            authority: 0.3,
            inappropriate_audience: true,
        });
        assert_eq!(publishers.publishers[1].publisher_id, 1);
        assert!(publishers.publishers[1].inappropriate_audience);
    }
}
