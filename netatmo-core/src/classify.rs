use tracing::debug;

use crate::model::{Module, ModuleType};

/// A station's modules sorted into display roles.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Classified<'a> {
    pub main: Option<&'a Module>,
    pub outdoor: Vec<&'a Module>,
    pub indoor: Vec<&'a Module>,
}

impl<'a> Classified<'a> {
    /// The outdoor module shown in the status header.
    pub fn primary_outdoor(&self) -> Option<&'a Module> {
        self.outdoor.first().copied()
    }
}

/// Partition modules by declared type. Unrecognized types land in no bucket.
pub fn classify<'a>(modules: impl IntoIterator<Item = &'a Module>) -> Classified<'a> {
    let mut classified = Classified::default();

    for module in modules {
        match module.module_type {
            ModuleType::Main => classified.main = Some(module),
            ModuleType::Outdoor => classified.outdoor.push(module),
            ModuleType::Indoor => classified.indoor.push(module),
            ModuleType::Unknown(_) => {
                debug!(module = %module.name, code = module.module_type.code(), "ignoring module");
            }
        }
    }

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_module_of_each_type() {
        let modules = vec![
            Module::new("Living room", ModuleType::Main),
            Module::new("Garden", ModuleType::Outdoor),
            Module::new("Bedroom", ModuleType::Indoor),
            Module::new("Rain gauge", ModuleType::from_code("NAModule3")),
        ];

        let classified = classify(&modules);

        assert_eq!(classified.main.map(|m| m.name.as_str()), Some("Living room"));
        assert_eq!(classified.outdoor.len(), 1);
        assert_eq!(classified.outdoor[0].name, "Garden");
        assert_eq!(classified.indoor.len(), 1);
        assert_eq!(classified.indoor[0].name, "Bedroom");

        let all: Vec<_> = classified
            .main
            .into_iter()
            .chain(classified.outdoor.iter().copied())
            .chain(classified.indoor.iter().copied())
            .collect();
        assert!(all.iter().all(|m| m.name != "Rain gauge"));
    }

    #[test]
    fn keeps_order_and_first_outdoor_is_primary() {
        let modules = vec![
            Module::new("North", ModuleType::Outdoor),
            Module::new("Office", ModuleType::Indoor),
            Module::new("South", ModuleType::Outdoor),
            Module::new("Attic", ModuleType::Indoor),
        ];

        let classified = classify(&modules);

        assert!(classified.main.is_none());
        assert_eq!(classified.primary_outdoor().map(|m| m.name.as_str()), Some("North"));
        let indoor: Vec<_> = classified.indoor.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(indoor, ["Office", "Attic"]);
    }

    #[test]
    fn empty_input_yields_empty_buckets() {
        let classified = classify(&[]);
        assert_eq!(classified, Classified::default());
    }
}
