//! The plant label list the classifier ranks against.
//!
//! Index `i` in a prediction always refers to `PLANT_CLASSES[i]`, so this
//! order is part of the model contract and must never be reshuffled.

/// Plant species known to the classifier, in class-index order.
pub const PLANT_CLASSES: [&str; 47] = [
    "African Violet (Saintpaulia ionantha)",
    "Aloe Vera",
    "Anthurium (Anthurium andraeanum)",
    "Areca Palm (Dypsis lutescens)",
    "Asparagus Fern (Asparagus setaceus)",
    "Begonia (Begonia spp.)",
    "Bird of Paradise (Strelitzia reginae)",
    "Birds Nest Fern (Asplenium nidus)",
    "Boston Fern (Nephrolepis exaltata)",
    "Calathea",
    "Cast Iron Plant (Aspidistra elatior)",
    "Chinese Money Plant (Pilea peperomioides)",
    "Chinese evergreen (Aglaonema)",
    "Christmas Cactus (Schlumbergera bridgesii)",
    "Chrysanthemum",
    "Ctenanthe",
    "Daffodils (Narcissus spp.)",
    "Dracaena",
    "Dumb Cane (Dieffenbachia spp.)",
    "Elephant Ear (Alocasia spp.)",
    "English Ivy (Hedera helix)",
    "Hyacinth (Hyacinthus orientalis)",
    "Iron Cross begonia (Begonia masoniana)",
    "Jade plant (Crassula ovata)",
    "Kalanchoe",
    "Lilium (Hemerocallis)",
    "Lily of the valley (Convallaria majalis)",
    "Money Tree (Pachira aquatica)",
    "Monstera Deliciosa (Monstera deliciosa)",
    "Orchid",
    "Parlor Palm (Chamaedorea elegans)",
    "Peace lily",
    "Poinsettia (Euphorbia pulcherrima)",
    "Polka Dot Plant (Hypoestes phyllostachya)",
    "Ponytail Palm (Beaucarnea recurvata)",
    "Pothos (Ivy arum)",
    "Prayer Plant (Maranta leuconeura)",
    "Rattlesnake Plant (Calathea lancifolia)",
    "Rubber Plant (Ficus elastica)",
    "Sago Palm (Cycas revoluta)",
    "Schefflera",
    "Snake plant (Sanseviera)",
    "Tradescantia",
    "Tulip",
    "Venus Flytrap",
    "Yucca",
    "ZZ Plant (Zamioculcas zamiifolia)",
];

/// An ordered, immutable list of class labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build a label set from any ordered list of names.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in plant label list.
    pub fn plants() -> Self {
        Self::new(PLANT_CLASSES)
    }

    /// Look up a label by class index.
    ///
    /// Returns `None` for negative indices as well as indices past the end.
    pub fn get(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.labels.get(i))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    /// Render one caption per label from a template containing `{}`.
    pub fn prompts(&self, template: &str) -> Vec<String> {
        self.labels
            .iter()
            .map(|label| template.replacen("{}", label, 1))
            .collect()
    }
}

impl Default for LabelSet {
    fn default() -> Self {
        Self::plants()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_labels_are_unique() {
        let mut seen = std::collections::HashSet::new();
        assert!(PLANT_CLASSES.iter().all(|label| seen.insert(*label)));
    }

    #[test]
    fn test_get_bounds() {
        let labels = LabelSet::plants();
        assert_eq!(labels.get(0), Some("African Violet (Saintpaulia ionantha)"));
        assert_eq!(labels.get(46), Some("ZZ Plant (Zamioculcas zamiifolia)"));
        assert_eq!(labels.get(47), None);
        assert_eq!(labels.get(-1), None);
    }

    #[test]
    fn test_prompts_follow_template() {
        let labels = LabelSet::new(["Tulip", "Yucca"]);
        assert_eq!(
            labels.prompts("This is a photo of a {}"),
            vec!["This is a photo of a Tulip", "This is a photo of a Yucca"]
        );
    }
}
