//! Static medical knowledge base.
//!
//! A small, process-wide table of condition categories. Each condition
//! carries its base probability, the lowercase symptom keywords that
//! suggest it, and the follow-up questions to ask when it matches.
//!
//! | Category | Condition | Base | Keywords |
//! |----------|-----------|------|----------|
//! | cardiovascular | Angina de Peito | 0.7 | 3 |
//! | cardiovascular | Infarto Agudo do Miocárdio | 0.8 | 3 |
//! | neurological | Enxaqueca | 0.6 | 2 |
//! | neurological | Ataque Isquêmico Transitório (AIT) | 0.4 | 2 |
//! | respiratory | Asma | 0.5 | 2 |
//!
//! The table is built once on first access and never mutated. Iteration
//! order (category, then condition) is significant: it is the tie-break
//! order for equally probable diagnoses and the generation order of
//! follow-up questions.

use std::sync::LazyLock;

use crate::model::condition_key;

/// A condition the engine can recognise.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Display name.
    pub name: &'static str,
    /// Derived key, see [`condition_key`].
    pub key: String,
    /// Base probability in [0, 1].
    pub base_probability: f64,
    /// Lowercase symptom keywords matched by substring.
    pub symptoms: &'static [&'static str],
    /// Ordered follow-up question texts.
    pub questions: &'static [&'static str],
}

impl Condition {
    fn new(
        name: &'static str,
        base_probability: f64,
        symptoms: &'static [&'static str],
        questions: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            key: condition_key(name),
            base_probability,
            symptoms,
            questions,
        }
    }

    /// Keywords of this condition contained in `text`.
    ///
    /// `text` must already be lowercase.
    #[must_use]
    pub fn matching_symptoms(&self, text: &str) -> Vec<&'static str> {
        self.symptoms
            .iter()
            .copied()
            .filter(|keyword| text.contains(keyword))
            .collect()
    }
}

/// A group of related conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Category key, also used as the category of generated questions.
    pub key: &'static str,
    /// Symptoms associated with the category as a whole.
    pub symptoms: &'static [&'static str],
    /// Conditions in tie-break order.
    pub conditions: Vec<Condition>,
}

static KNOWLEDGE_BASE: LazyLock<Vec<Category>> = LazyLock::new(build);

/// All categories in their fixed order.
#[must_use]
pub fn categories() -> &'static [Category] {
    &KNOWLEDGE_BASE
}

/// Every condition paired with its category key, in table order.
pub fn conditions() -> impl Iterator<Item = (&'static str, &'static Condition)> {
    KNOWLEDGE_BASE
        .iter()
        .flat_map(|category| category.conditions.iter().map(move |c| (category.key, c)))
}

/// Look up a condition by display name.
#[must_use]
pub fn find(name: &str) -> Option<&'static Condition> {
    conditions().map(|(_, c)| c).find(|c| c.name == name)
}

fn build() -> Vec<Category> {
    vec![
        Category {
            key: "cardiovascular",
            symptoms: &[
                "aperto no peito",
                "dor no peito",
                "tontura",
                "falta de ar",
                "palpitação",
                "desmaio",
            ],
            conditions: vec![
                Condition::new(
                    "Angina de Peito",
                    0.7,
                    &["aperto no peito", "tontura", "falta de ar"],
                    &[
                        "A dor piora com esforço físico?",
                        "A dor irradia para o braço esquerdo?",
                        "Você tem histórico de diabetes?",
                        "Você fuma?",
                        "A dor melhora com repouso?",
                    ],
                ),
                Condition::new(
                    "Infarto Agudo do Miocárdio",
                    0.8,
                    &["aperto no peito", "tontura", "sudorese"],
                    &[
                        "A dor é intensa e constante?",
                        "Você sente náuseas ou vômitos?",
                        "A dor irradia para o pescoço ou mandíbula?",
                        "Você tem histórico familiar de problemas cardíacos?",
                    ],
                ),
            ],
        },
        Category {
            key: "neurological",
            symptoms: &[
                "dor de cabeça",
                "tontura",
                "desmaio",
                "convulsão",
                "perda de consciência",
            ],
            conditions: vec![
                Condition::new(
                    "Enxaqueca",
                    0.6,
                    &["dor de cabeça", "tontura"],
                    &[
                        "A dor de cabeça é latejante?",
                        "Você tem sensibilidade à luz?",
                        "A dor dura mais de 4 horas?",
                        "Você tem histórico de enxaqueca?",
                    ],
                ),
                Condition::new(
                    "Ataque Isquêmico Transitório (AIT)",
                    0.4,
                    &["tontura", "perda de consciência"],
                    &[
                        "Você teve perda de força em um lado do corpo?",
                        "Você teve dificuldade para falar?",
                        "Você tem pressão alta?",
                        "Os sintomas duraram menos de 24 horas?",
                    ],
                ),
            ],
        },
        Category {
            key: "respiratory",
            symptoms: &[
                "falta de ar",
                "tosse",
                "chiado no peito",
                "dor no peito ao respirar",
            ],
            conditions: vec![Condition::new(
                "Asma",
                0.5,
                &["falta de ar", "chiado no peito"],
                &[
                    "Você tem histórico de asma?",
                    "Os sintomas pioram à noite?",
                    "Você tem alergias?",
                    "Os sintomas melhoram com medicamento inalatório?",
                ],
            )],
        },
    ]
}
