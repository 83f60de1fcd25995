//! Recommend cards for a fixed mono-red list against a local Solr corpus.
//!
//! Expects a running Solr instance holding the deck corpus; point
//! SOLR_URL/SOLR_CORE elsewhere to override the defaults.

use deck_recommender::backend::{SimilarityBackend, SolrBackend, SolrConfig, TermFrequencyCache};
use deck_recommender::deck::sanitize;
use deck_recommender::recommend::{DfWeighting, RecommendRequest, Recommender, ScoringConfig};
use std::sync::Arc;

/// Raw card names as they appear on a deck list; sanitized into corpus
/// identifiers before querying.
const MONO_RED_TROUBLEMAKER: &[&str] = &[
    "Anger",
    "Arcane Signet",
    "Atsushi, the Blazing Sky",
    "Avacyn's Judgment",
    "Birgi, God of Storytelling",
    "Blasphemous Act",
    "Buried Ruin",
    "Castle Embereth",
    "Chain Reaction",
    "Chaos Warp",
    "Circuit Mender",
    "Combat Celebrant",
    "Containment Construct",
    "Delina, Wild Mage",
    "Dualcaster Mage",
    "Duplicant",
    "Dwarven Mine",
    "Fable of the Mirror-Breaker",
    "Faithless Looting",
    "Feldon of the Third Path",
    "Goblin Bombardment",
    "Goblin Engineer",
    "Great Furnace",
    "High Market",
    "Idol of Oblivion",
    "Impact Tremors",
    "Imperial Recruiter",
    "Impulsive Pilferer",
    "Iron Myr",
    "Jaxis, the Troublemaker",
    "Kiki-Jiki, Mirror Breaker",
    "Lightning Greaves",
    "Meteor Golem",
    "Molten Primordial",
    "Mountain",
    "Myr Battlesphere",
    "Myr Retriever",
    "Outpost Siege",
    "Panharmonicon",
    "Priest of Urabrask",
    "Purphoros, God of the Forge",
    "Pyretic Ritual",
    "Red Dragon",
    "Reverberate",
    "Rogue's Passage",
    "Ruby Medallion",
    "Seething Song",
    "Siege-Gang Commander",
    "Skullclamp",
    "Sol Ring",
    "Solemn Simulacrum",
    "Spinerock Knoll",
    "Squee, Goblin Nabob",
    "Thornbite Staff",
    "Thousand-Year Elixir",
    "Twinflame",
    "Valakut, the Molten Pinnacle",
    "Vandalblast",
    "War Room",
    "Warstorm Surge",
    "Zealous Conscripts",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = SolrConfig::default().from_env();
    let backend: Arc<dyn SimilarityBackend> = Arc::new(SolrBackend::new(config)?);
    let term_frequencies = Arc::new(TermFrequencyCache::new(backend.clone()));
    let recommender = Recommender::new(backend, term_frequencies);

    let request = RecommendRequest {
        cards: MONO_RED_TROUBLEMAKER.iter().map(|name| sanitize(name)).collect(),
        exclude_id: None,
        k: 7,
    };
    let scoring = ScoringConfig {
        similar_decks_count: 5,
        use_deck_score: true,
        discount_factor: 0.7,
        df_weighting: DfWeighting::Identity,
    };

    for card in recommender.recommend(&request, &scoring).await? {
        println!("https://edhrec.com/cards/{card}");
    }
    Ok(())
}
