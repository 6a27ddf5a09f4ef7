use std::collections::HashSet;

use serde::Serialize;

use crate::baseline::baseline_model::{Baseline, ComponentBaseline, Scenario, ScreenPattern};
use crate::component::component_model::{Component, ComponentType};
use crate::screen::screen_model::{Screen, ScreenType};

/// Scenarios offered per component type.
pub const MAX_COMPONENT_SCENARIOS: usize = 5;

/// Scenarios offered per screen pattern.
pub const MAX_PATTERN_SCENARIOS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScenarios {
    pub component_type: ComponentType,
    /// First component of this type found on the screen
    pub component_name: String,
    pub scenarios: Vec<Scenario>,
}

/// Baseline scenarios relevant to one screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaselineScenarios {
    pub component_scenarios: Vec<ComponentScenarios>,
    pub pattern_scenarios: Vec<Scenario>,
}

impl BaselineScenarios {
    pub fn is_empty(&self) -> bool {
        self.component_scenarios.is_empty() && self.pattern_scenarios.is_empty()
    }
}

impl Baseline {
    pub fn match_component(&self, kind: ComponentType) -> Option<&ComponentBaseline> {
        self.ui_components.get(kind.as_str())
    }

    /// Pattern keyed by the screen type, else the first pattern with a name
    /// keyword contained in the screen name.
    pub fn detect_screen_pattern(&self, screen_type: ScreenType, name: &str) -> Option<&ScreenPattern> {
        if let Some((_, pattern)) = self
            .screen_patterns
            .iter()
            .find(|(key, _)| key == screen_type.as_str())
        {
            return Some(pattern);
        }

        let lower = name.to_lowercase();
        self.screen_patterns
            .iter()
            .find(|(_, pattern)| {
                pattern
                    .detection_criteria
                    .screen_name_keywords
                    .iter()
                    .any(|kw| lower.contains(kw.as_str()))
            })
            .map(|(_, pattern)| pattern)
    }

    /// Walk the screen's components in pre-order; the first component of
    /// each baseline-backed type contributes its scenarios.
    pub fn scenarios_for_screen(&self, screen: &Screen) -> BaselineScenarios {
        let mut seen = HashSet::new();
        let mut component_scenarios = Vec::new();
        self.collect_component_scenarios(&screen.components, &mut seen, &mut component_scenarios);

        let pattern_scenarios = self
            .detect_screen_pattern(screen.screen_type, &screen.name)
            .map(|p| {
                p.test_scenarios
                    .iter()
                    .take(MAX_PATTERN_SCENARIOS)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        BaselineScenarios {
            component_scenarios,
            pattern_scenarios,
        }
    }

    fn collect_component_scenarios(
        &self,
        components: &[Component],
        seen: &mut HashSet<ComponentType>,
        out: &mut Vec<ComponentScenarios>,
    ) {
        for component in components {
            let kind = component.component_type;
            if !seen.contains(&kind) {
                if let Some(entry) = self.match_component(kind) {
                    let scenarios: Vec<Scenario> = entry
                        .all_scenarios()
                        .take(MAX_COMPONENT_SCENARIOS)
                        .cloned()
                        .collect();

                    if !scenarios.is_empty() {
                        out.push(ComponentScenarios {
                            component_type: kind,
                            component_name: component.name.clone(),
                            scenarios,
                        });
                        seen.insert(kind);
                    }
                }
            }

            self.collect_component_scenarios(&component.children, seen, out);
        }
    }
}
