//! Guest profiles and the normalizer that builds them from raw survey records.
//!
//! Survey answers arrive as a loosely typed key/value map. Everything past
//! [`ProfileNormalizer`] works with the closed trait schema defined here, so
//! the scorer never has to guess what a survey happened to return.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::domain::foundation::GuestId;

/// Lower bound of every numeric survey scale.
pub const SCALE_MIN: f64 = 1.0;
/// Upper bound of every numeric survey scale.
pub const SCALE_MAX: f64 = 5.0;
/// Value assumed for a scale the guest did not answer.
pub const SCALE_MIDPOINT: f64 = 3.0;

/// Lowercases and snake-cases a survey key or answer.
///
/// `"conversationStyle"`, `"Conversation Style"` and `"conversation-style"`
/// all become `"conversation_style"`.
pub(crate) fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for c in raw.trim().chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else if c == ' ' || c == '-' || c == '_' || c == '/' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out.trim_end_matches('_').to_string()
}

macro_rules! categorical_trait {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => [$($alias:literal),+ $(,)?]),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
            /// Not answered or not recognised. Scores neutrally.
            #[default]
            Unknown,
        }

        impl $name {
            /// Parses a free-form survey answer, falling back to `Unknown`.
            pub fn parse(raw: &str) -> Self {
                match normalize_key(raw).as_str() {
                    $($($alias)|+ => $name::$variant,)+
                    _ => $name::Unknown,
                }
            }

            /// Returns true unless the value is `Unknown`.
            pub fn is_known(&self) -> bool {
                !matches!(self, $name::Unknown)
            }
        }
    };
}

categorical_trait! {
    /// How a guest tends to take part in dinner conversation.
    ConversationStyle {
        Listener => ["listener", "listening", "good_listener"],
        Storyteller => ["storyteller", "storytelling", "talker", "talkative"],
        Debater => ["debater", "debate", "debating", "discussion"],
        Questioner => ["questioner", "curious", "asking_questions", "interviewer"],
    }
}

categorical_trait! {
    /// Topic the guest would most like to talk about.
    DinnerTopic {
        Travel => ["travel", "travelling", "traveling"],
        Culture => ["culture", "arts", "art", "music", "film", "movies"],
        Career => ["career", "work", "business", "entrepreneurship"],
        Food => ["food", "cooking", "gastronomy", "wine"],
        Sports => ["sports", "sport", "fitness", "outdoors"],
        Ideas => ["ideas", "philosophy", "science", "technology", "tech"],
    }
}

categorical_trait! {
    /// Preferred energy of the table.
    GroupDynamic {
        Intimate => ["intimate", "small", "quiet", "calm", "cozy"],
        Lively => ["lively", "energetic", "loud", "party", "animated"],
        Balanced => ["balanced", "mixed", "flexible", "a_bit_of_both"],
    }
}

categorical_trait! {
    /// Kind of humour the guest enjoys.
    HumorType {
        Witty => ["witty", "wit", "clever", "wordplay"],
        Sarcastic => ["sarcastic", "sarcasm", "ironic", "irony"],
        Silly => ["silly", "goofy", "playful", "slapstick"],
        Dry => ["dry", "deadpan", "understated"],
        Dark => ["dark", "black", "morbid"],
    }
}

categorical_trait! {
    /// How the guest usually dresses for a dinner out.
    WardrobeStyle {
        Casual => ["casual", "relaxed", "comfortable"],
        SmartCasual => ["smart_casual", "business_casual", "neat"],
        Formal => ["formal", "elegant", "dressy", "classic"],
        Trendy => ["trendy", "fashionable", "streetwear", "bold"],
    }
}

categorical_trait! {
    /// What the guest most wants out of meeting new people.
    MeetingPriority {
        Friendship => ["friendship", "friends", "friend", "new_friends"],
        Romance => ["romance", "romantic", "dating", "love", "partner"],
        Networking => ["networking", "professional", "business_contacts"],
        Fun => ["fun", "experience", "adventure", "good_time"],
    }
}

categorical_trait! {
    /// Relationship status as reported by the guest.
    RelationshipStatus {
        Single => ["single"],
        InRelationship => ["in_relationship", "in_a_relationship", "relationship", "taken"],
        Married => ["married", "engaged", "partnered"],
    }
}

categorical_trait! {
    /// Gender as reported by the guest.
    Gender {
        Female => ["female", "woman", "f"],
        Male => ["male", "man", "m"],
        NonBinary => ["non_binary", "nonbinary", "nb", "other"],
    }
}

categorical_trait! {
    /// Recognised dietary regimes. Free-text restrictions map to `Unknown`
    /// and are kept verbatim on [`DietaryConstraint::note`].
    DietaryTag {
        NoRestriction => ["none", "no", "omnivore", "anything", "no_restriction", "no_restrictions"],
        Vegetarian => ["vegetarian", "veggie", "lacto_ovo"],
        Vegan => ["vegan", "plant_based"],
        Pescatarian => ["pescatarian", "pescetarian"],
        Halal => ["halal"],
        Kosher => ["kosher"],
        GlutenFree => ["gluten_free", "celiac", "coeliac"],
    }
}

impl DietaryTag {
    /// How strongly two regimes clash when sharing a table, in `[0, 1]`.
    ///
    /// Unknown regimes never clash.
    pub fn conflict_severity(&self, other: &DietaryTag) -> f64 {
        use DietaryTag::*;
        match (self, other) {
            (Vegan, NoRestriction) | (NoRestriction, Vegan) => 1.0,
            (Vegetarian, NoRestriction) | (NoRestriction, Vegetarian) => 0.5,
            (Vegan, Pescatarian) | (Pescatarian, Vegan) => 0.5,
            (Halal, Kosher) | (Kosher, Halal) => 0.25,
            _ => 0.0,
        }
    }
}

/// Ordinal spending tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpendingTier {
    Budget,
    Moderate,
    Premium,
    Luxury,
    #[default]
    Unknown,
}

impl SpendingTier {
    /// Parses a tier name, dollar-sign notation or a 1-4 rank.
    pub fn parse(raw: &str) -> Self {
        match normalize_key(raw).as_str() {
            "budget" | "low" | "$" | "1" => SpendingTier::Budget,
            "moderate" | "medium" | "mid" | "$$" | "2" => SpendingTier::Moderate,
            "premium" | "high" | "$$$" | "3" => SpendingTier::Premium,
            "luxury" | "very_high" | "$$$$" | "4" => SpendingTier::Luxury,
            _ => SpendingTier::Unknown,
        }
    }

    /// Ordinal rank (1 = budget), `None` when unknown.
    pub fn rank(&self) -> Option<u8> {
        match self {
            SpendingTier::Budget => Some(1),
            SpendingTier::Moderate => Some(2),
            SpendingTier::Premium => Some(3),
            SpendingTier::Luxury => Some(4),
            SpendingTier::Unknown => None,
        }
    }
}

/// A value on a 1-5 survey scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitScale {
    value: f64,
    reported: bool,
}

impl TraitScale {
    /// A scale the guest answered, clamped to `[1, 5]`.
    pub fn reported(value: f64) -> Self {
        if !value.is_finite() {
            return Self::unreported();
        }
        Self {
            value: value.clamp(SCALE_MIN, SCALE_MAX),
            reported: true,
        }
    }

    /// A scale the guest left blank; sits at the midpoint.
    pub fn unreported() -> Self {
        Self {
            value: SCALE_MIDPOINT,
            reported: false,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_reported(&self) -> bool {
        self.reported
    }
}

impl Default for TraitScale {
    fn default() -> Self {
        Self::unreported()
    }
}

/// Categorical personality traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoricalTraits {
    pub conversation_style: ConversationStyle,
    pub preferred_topic: DinnerTopic,
    pub group_dynamic: GroupDynamic,
    pub humor_type: HumorType,
    pub wardrobe_style: WardrobeStyle,
    pub meeting_priority: MeetingPriority,
}

impl CategoricalTraits {
    /// Number of fields where both sides are known and equal.
    pub fn matches_with(&self, other: &CategoricalTraits) -> u32 {
        let matches = [
            self.conversation_style.is_known()
                && self.conversation_style == other.conversation_style,
            self.preferred_topic.is_known() && self.preferred_topic == other.preferred_topic,
            self.group_dynamic.is_known() && self.group_dynamic == other.group_dynamic,
            self.humor_type.is_known() && self.humor_type == other.humor_type,
            self.wardrobe_style.is_known() && self.wardrobe_style == other.wardrobe_style,
            self.meeting_priority.is_known() && self.meeting_priority == other.meeting_priority,
        ];
        matches.iter().filter(|m| **m).count() as u32
    }
}

/// Numeric 1-5 scale traits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NumericTraits {
    pub introversion: TraitScale,
    pub alone_time: TraitScale,
    pub family_orientation: TraitScale,
    pub spirituality: TraitScale,
    pub humor_intensity: TraitScale,
}

impl NumericTraits {
    /// All scales in a fixed order.
    pub fn scales(&self) -> [TraitScale; 5] {
        [
            self.introversion,
            self.alone_time,
            self.family_orientation,
            self.spirituality,
            self.humor_intensity,
        ]
    }
}

/// Demographic fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Demographics {
    pub age: Option<u8>,
    pub gender: Gender,
    pub relationship_status: RelationshipStatus,
    pub has_children: Option<bool>,
}

/// Dietary constraint: a recognised regime plus any free text the guest gave.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DietaryConstraint {
    pub tag: DietaryTag,
    pub note: Option<String>,
}

/// How to reach a guest. Never used for scoring.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Fixed-shape compatibility profile of one guest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestProfile {
    pub id: GuestId,
    pub display_name: String,
    pub contact: ContactInfo,
    pub demographics: Demographics,
    pub categorical: CategoricalTraits,
    pub numeric: NumericTraits,
    pub spending_tier: SpendingTier,
    pub dietary: DietaryConstraint,
    pub must_seat_with: BTreeSet<GuestId>,
    pub must_not_seat_with: BTreeSet<GuestId>,
}

impl GuestProfile {
    /// A profile with every trait unknown. Useful as a starting point in tests
    /// and for records that carry nothing but an id.
    pub fn blank(id: GuestId) -> Self {
        Self {
            display_name: id.as_str().to_string(),
            id,
            contact: ContactInfo::default(),
            demographics: Demographics::default(),
            categorical: CategoricalTraits::default(),
            numeric: NumericTraits::default(),
            spending_tier: SpendingTier::Unknown,
            dietary: DietaryConstraint::default(),
            must_seat_with: BTreeSet::new(),
            must_not_seat_with: BTreeSet::new(),
        }
    }
}

/// A guest record as supplied by the roster collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGuestRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Survey answers keyed by question name.
    #[serde(default)]
    pub answers: BTreeMap<String, Value>,
    #[serde(default)]
    pub must_seat_with: Vec<String>,
    #[serde(default)]
    pub must_not_seat_with: Vec<String>,
}

/// Converts raw roster records into [`GuestProfile`]s.
///
/// Never rejects a guest: missing or malformed answers fall back to neutral
/// defaults, a blank id is replaced with a positional one, and repeated ids
/// keep their first record.
pub struct ProfileNormalizer;

impl ProfileNormalizer {
    /// Normalizes a whole roster.
    ///
    /// The result is sorted by guest id. Seating hints that point at the guest
    /// itself or at someone not on the roster are dropped.
    pub fn normalize_roster(records: &[RawGuestRecord]) -> Vec<GuestProfile> {
        let mut seen = HashSet::new();
        let mut profiles = Vec::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            let profile = Self::normalize(record, position);
            if !seen.insert(profile.id.clone()) {
                tracing::debug!(guest_id = %profile.id, "Dropping repeated roster entry");
                continue;
            }
            profiles.push(profile);
        }

        for profile in profiles.iter_mut() {
            let own = profile.id.clone();
            profile
                .must_seat_with
                .retain(|other| *other != own && seen.contains(other));
            profile
                .must_not_seat_with
                .retain(|other| *other != own && seen.contains(other));
        }

        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        profiles
    }

    /// Normalizes a single record. `position` names anonymous records.
    pub fn normalize(record: &RawGuestRecord, position: usize) -> GuestProfile {
        let id = GuestId::new(record.id.trim()).unwrap_or_else(|_| GuestId::anonymous(position));
        let answers = Answers::new(&record.answers);

        let display_name = record
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| id.as_str().to_string());

        let dietary_raw = answers.text(&["dietary", "dietary_restrictions", "diet", "allergies"]);
        let dietary = match dietary_raw {
            Some(raw) => {
                let tag = DietaryTag::parse(&raw);
                DietaryConstraint {
                    tag,
                    note: (!tag.is_known()).then_some(raw),
                }
            }
            None => DietaryConstraint::default(),
        };

        GuestProfile {
            contact: ContactInfo {
                email: clean(record.email.as_deref()),
                phone: clean(record.phone.as_deref()),
            },
            demographics: Demographics {
                age: answers
                    .number(&["age"])
                    .filter(|a| *a >= 1.0 && *a <= 120.0)
                    .map(|a| a.round() as u8),
                gender: answers.categorical(&["gender", "sex"], Gender::parse),
                relationship_status: answers.categorical(
                    &["relationship_status", "relationship", "marital_status"],
                    RelationshipStatus::parse,
                ),
                has_children: answers.flag(&["has_children", "children", "kids"]),
            },
            categorical: CategoricalTraits {
                conversation_style: answers.categorical(
                    &["conversation_style", "dinner_style"],
                    ConversationStyle::parse,
                ),
                preferred_topic: answers
                    .categorical(&["preferred_topic", "topic", "favorite_topic"], DinnerTopic::parse),
                group_dynamic: answers.categorical(
                    &["group_dynamic", "group_dynamics", "group_preference"],
                    GroupDynamic::parse,
                ),
                humor_type: answers.categorical(&["humor_type", "humour_type", "humor"], HumorType::parse),
                wardrobe_style: answers
                    .categorical(&["wardrobe_style", "dress_style", "style"], WardrobeStyle::parse),
                meeting_priority: answers.categorical(
                    &["meeting_priority", "looking_for", "goal"],
                    MeetingPriority::parse,
                ),
            },
            numeric: NumericTraits {
                introversion: answers.scale(&["introversion", "introvert_scale"]),
                alone_time: answers.scale(&["alone_time", "alone_time_preference"]),
                family_orientation: answers.scale(&["family_orientation", "family"]),
                spirituality: answers.scale(&["spirituality", "spiritual"]),
                humor_intensity: answers.scale(&["humor_intensity", "humour_intensity", "humor_level"]),
            },
            spending_tier: answers
                .text(&["spending_tier", "spending", "budget"])
                .map(|raw| SpendingTier::parse(&raw))
                .unwrap_or_default(),
            dietary,
            must_seat_with: parse_hints(&record.must_seat_with),
            must_not_seat_with: parse_hints(&record.must_not_seat_with),
            display_name,
            id,
        }
    }
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_hints(raw: &[String]) -> BTreeSet<GuestId> {
    raw.iter().filter_map(|id| GuestId::new(id.trim()).ok()).collect()
}

/// Read-only view over survey answers with normalized keys.
struct Answers {
    by_key: BTreeMap<String, Value>,
}

impl Answers {
    fn new(raw: &BTreeMap<String, Value>) -> Self {
        let mut by_key = BTreeMap::new();
        for (key, value) in raw {
            by_key.entry(normalize_key(key)).or_insert_with(|| value.clone());
        }
        Self { by_key }
    }

    fn lookup(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.by_key.get(*k))
            .find(|v| !v.is_null())
    }

    fn text(&self, keys: &[&str]) -> Option<String> {
        match self.lookup(keys)? {
            Value::String(s) => clean(Some(s)),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            // Multiple-choice answers: take the first option.
            Value::Array(items) => items.iter().find_map(|v| v.as_str()).and_then(|s| clean(Some(s))),
            _ => None,
        }
    }

    fn number(&self, keys: &[&str]) -> Option<f64> {
        match self.lookup(keys)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite())
    }

    fn flag(&self, keys: &[&str]) -> Option<bool> {
        match self.lookup(keys)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            Value::String(s) => match normalize_key(s).as_str() {
                "yes" | "y" | "true" | "1" => Some(true),
                "no" | "n" | "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn scale(&self, keys: &[&str]) -> TraitScale {
        self.number(keys)
            .map(TraitScale::reported)
            .unwrap_or_else(TraitScale::unreported)
    }

    fn categorical<T: Default>(&self, keys: &[&str], parse: fn(&str) -> T) -> T {
        self.text(keys).map(|raw| parse(&raw)).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, answers: Value) -> RawGuestRecord {
        let answers = answers
            .as_object()
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        RawGuestRecord {
            id: id.to_string(),
            name: Some(format!("Guest {}", id)),
            answers,
            ..Default::default()
        }
    }

    #[test]
    fn normalize_key_handles_camel_spaces_and_dashes() {
        assert_eq!(normalize_key("conversationStyle"), "conversation_style");
        assert_eq!(normalize_key(" Smart Casual "), "smart_casual");
        assert_eq!(normalize_key("gluten-free"), "gluten_free");
        assert_eq!(normalize_key("SmartCasual"), "smart_casual");
        assert_eq!(normalize_key("$$$"), "$$$");
    }

    #[test]
    fn categorical_parse_recognises_synonyms() {
        assert_eq!(ConversationStyle::parse("Good listener"), ConversationStyle::Listener);
        assert_eq!(WardrobeStyle::parse("business-casual"), WardrobeStyle::SmartCasual);
        assert_eq!(HumorType::parse("something else"), HumorType::Unknown);
        assert!(!HumorType::Unknown.is_known());
    }

    #[test]
    fn scales_are_clamped_and_flagged() {
        let high = TraitScale::reported(9.0);
        assert_eq!(high.value(), 5.0);
        assert!(high.is_reported());

        let low = TraitScale::reported(-2.0);
        assert_eq!(low.value(), 1.0);

        let nan = TraitScale::reported(f64::NAN);
        assert_eq!(nan.value(), SCALE_MIDPOINT);
        assert!(!nan.is_reported());
    }

    #[test]
    fn full_record_normalizes_every_field() {
        let raw = record(
            "g1",
            json!({
                "age": "34",
                "gender": "Woman",
                "relationshipStatus": "single",
                "hasChildren": "no",
                "conversationStyle": "storyteller",
                "preferredTopic": "Travel",
                "groupDynamic": "lively",
                "humorType": "dry",
                "wardrobeStyle": "formal",
                "meetingPriority": "friendship",
                "introversion": 2,
                "aloneTime": "4",
                "familyOrientation": 7,
                "spirituality": 1,
                "humorIntensity": 5,
                "spendingTier": "$$$",
                "dietary": "vegan"
            }),
        );
        let profile = ProfileNormalizer::normalize(&raw, 0);

        assert_eq!(profile.id.as_str(), "g1");
        assert_eq!(profile.display_name, "Guest g1");
        assert_eq!(profile.demographics.age, Some(34));
        assert_eq!(profile.demographics.gender, Gender::Female);
        assert_eq!(profile.demographics.has_children, Some(false));
        assert_eq!(profile.categorical.conversation_style, ConversationStyle::Storyteller);
        assert_eq!(profile.categorical.preferred_topic, DinnerTopic::Travel);
        assert_eq!(profile.categorical.group_dynamic, GroupDynamic::Lively);
        assert_eq!(profile.numeric.alone_time.value(), 4.0);
        assert_eq!(profile.numeric.family_orientation.value(), 5.0);
        assert_eq!(profile.spending_tier, SpendingTier::Premium);
        assert_eq!(profile.dietary.tag, DietaryTag::Vegan);
        assert_eq!(profile.dietary.note, None);
    }

    #[test]
    fn empty_record_gets_neutral_defaults() {
        let raw = RawGuestRecord {
            id: "g2".to_string(),
            ..Default::default()
        };
        let profile = ProfileNormalizer::normalize(&raw, 0);

        assert_eq!(profile.display_name, "g2");
        assert_eq!(profile.categorical, CategoricalTraits::default());
        for scale in profile.numeric.scales() {
            assert_eq!(scale.value(), SCALE_MIDPOINT);
            assert!(!scale.is_reported());
        }
        assert_eq!(profile.spending_tier, SpendingTier::Unknown);
        assert_eq!(profile.dietary.tag, DietaryTag::Unknown);
    }

    #[test]
    fn malformed_answers_are_admitted_as_unknown() {
        let raw = record(
            "g3",
            json!({
                "age": "old",
                "introversion": {"nested": true},
                "humorType": 42,
                "dietary": "no shellfish please"
            }),
        );
        let profile = ProfileNormalizer::normalize(&raw, 0);

        assert_eq!(profile.demographics.age, None);
        assert!(!profile.numeric.introversion.is_reported());
        assert_eq!(profile.categorical.humor_type, HumorType::Unknown);
        assert_eq!(profile.dietary.tag, DietaryTag::Unknown);
        assert_eq!(profile.dietary.note.as_deref(), Some("no shellfish please"));
    }

    #[test]
    fn blank_id_gets_positional_name() {
        let raw = RawGuestRecord::default();
        let profile = ProfileNormalizer::normalize(&raw, 6);
        assert_eq!(profile.id.as_str(), "anonymous-0007");
    }

    #[test]
    fn roster_is_sorted_deduplicated_and_hints_filtered() {
        let mut b = record("b", json!({}));
        b.must_seat_with = vec!["a".to_string(), "b".to_string(), "ghost".to_string()];
        b.must_not_seat_with = vec!["c".to_string()];
        let a = record("a", json!({}));
        let c = record("c", json!({}));
        let duplicate_a = record("a", json!({"age": 50}));

        let profiles = ProfileNormalizer::normalize_roster(&[b, a, c, duplicate_a]);
        let ids: Vec<_> = profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(profiles[0].demographics.age, None);

        let b = &profiles[1];
        assert_eq!(
            b.must_seat_with.iter().map(GuestId::as_str).collect::<Vec<_>>(),
            vec!["a"]
        );
        assert_eq!(
            b.must_not_seat_with.iter().map(GuestId::as_str).collect::<Vec<_>>(),
            vec!["c"]
        );
    }

    #[test]
    fn dietary_conflicts_are_symmetric() {
        let pairs = [
            (DietaryTag::Vegan, DietaryTag::NoRestriction),
            (DietaryTag::Vegetarian, DietaryTag::NoRestriction),
            (DietaryTag::Halal, DietaryTag::Kosher),
            (DietaryTag::Unknown, DietaryTag::Vegan),
        ];
        for (a, b) in pairs {
            assert_eq!(a.conflict_severity(&b), b.conflict_severity(&a));
        }
        assert_eq!(DietaryTag::Unknown.conflict_severity(&DietaryTag::Vegan), 0.0);
    }

    #[test]
    fn spending_tier_parses_names_ranks_and_dollars() {
        assert_eq!(SpendingTier::parse("Budget"), SpendingTier::Budget);
        assert_eq!(SpendingTier::parse("$$"), SpendingTier::Moderate);
        assert_eq!(SpendingTier::parse("4"), SpendingTier::Luxury);
        assert_eq!(SpendingTier::parse("whatever").rank(), None);
    }
}
