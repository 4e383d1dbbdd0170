//! Tagged module collection.
//!
//! Modules are stored as a tagged enum rather than trait objects so the
//! coordinator can reach a concrete module (for example to show a
//! conversation) without downcasting.

use crate::modules::{
    ContactsModule, ConversationsModule, ModuleCoordinator, ModuleKind, ProfileModule,
    SettingsModule,
};
use anyhow::{bail, Result};

pub enum Module {
    Contacts(ContactsModule),
    Conversations(ConversationsModule),
    Settings(SettingsModule),
    Profile(ProfileModule),
}

impl Module {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Module::Contacts(_) => ModuleKind::Contacts,
            Module::Conversations(_) => ModuleKind::Conversations,
            Module::Settings(_) => ModuleKind::Settings,
            Module::Profile(_) => ModuleKind::Profile,
        }
    }

    pub fn as_coordinator(&self) -> &dyn ModuleCoordinator {
        match self {
            Module::Contacts(m) => m,
            Module::Conversations(m) => m,
            Module::Settings(m) => m,
            Module::Profile(m) => m,
        }
    }

    pub fn as_coordinator_mut(&mut self) -> &mut dyn ModuleCoordinator {
        match self {
            Module::Contacts(m) => m,
            Module::Conversations(m) => m,
            Module::Settings(m) => m,
            Module::Profile(m) => m,
        }
    }
}

/// Ordered modules, at most one of each kind. Order is tab order and never
/// changes after construction.
pub struct ModuleSet {
    modules: Vec<Module>,
}

impl ModuleSet {
    pub fn new(modules: Vec<Module>) -> Result<Self> {
        for (i, module) in modules.iter().enumerate() {
            if modules[..i].iter().any(|m| m.kind() == module.kind()) {
                bail!("Module {} registered twice", module.kind());
            }
        }
        Ok(Self { modules })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn kinds(&self) -> Vec<ModuleKind> {
        self.modules.iter().map(Module::kind).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.modules.iter_mut()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Module> {
        self.modules.get_mut(index)
    }

    /// Find the module of `kind` and its position.
    pub fn find(&self, kind: ModuleKind) -> Option<(usize, &Module)> {
        self.modules
            .iter()
            .enumerate()
            .find(|(_, m)| m.kind() == kind)
    }

    pub fn find_mut(&mut self, kind: ModuleKind) -> Option<(usize, &mut Module)> {
        self.modules
            .iter_mut()
            .enumerate()
            .find(|(_, m)| m.kind() == kind)
    }

    pub fn conversations_mut(&mut self) -> Option<(usize, &mut ConversationsModule)> {
        match self.find_mut(ModuleKind::Conversations)? {
            (index, Module::Conversations(module)) => Some((index, module)),
            _ => None,
        }
    }

    pub fn conversations(&self) -> Option<(usize, &ConversationsModule)> {
        match self.find(ModuleKind::Conversations)? {
            (index, Module::Conversations(module)) => Some((index, module)),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<(usize, &ProfileModule)> {
        match self.find(ModuleKind::Profile)? {
            (index, Module::Profile(module)) => Some((index, module)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::{LocalMessenger, LocalMessengerOptions};
    use crate::styles::Theme;
    use std::rc::Rc;

    fn settings() -> Module {
        Module::Settings(SettingsModule::new(Theme::default()))
    }

    fn profile() -> Module {
        let engine = Rc::new(LocalMessenger::new(LocalMessengerOptions::default(), None));
        Module::Profile(ProfileModule::new(Theme::default(), engine))
    }

    #[test]
    fn test_duplicate_kind_is_rejected() {
        assert!(ModuleSet::new(vec![settings(), settings()]).is_err());
    }

    #[test]
    fn test_find_returns_position() {
        let set = ModuleSet::new(vec![settings(), profile()]).unwrap();
        let (index, module) = set.find(ModuleKind::Profile).unwrap();
        assert_eq!(index, 1);
        assert_eq!(module.kind(), ModuleKind::Profile);
        assert_eq!(set.kinds(), vec![ModuleKind::Settings, ModuleKind::Profile]);
    }

    #[test]
    fn test_missing_kind_is_not_found() {
        let mut set = ModuleSet::new(vec![settings()]).unwrap();
        assert!(set.find(ModuleKind::Contacts).is_none());
        assert!(set.conversations_mut().is_none());
        assert!(set.profile().is_none());
    }
}
