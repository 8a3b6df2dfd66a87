//! The kit manager.
//!
//! Owns the in-memory kit catalog and the active kit, keeps both in sync
//! with the kit store, and announces every change of the active kit.

use crate::probe::CompilerProbe;
use crate::scanner::DirectoryScanner;
use crate::store::KitStore;
use crate::watcher::StoreWatcher;
use cmkits_core::util::fs::exists;
use cmkits_types::{
    Kit, KitChoice, KitError, KitPicker, MissingCompilerPolicy, ProcessRunner, Result, StateStore,
    ToolchainLocator,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Buffered active-kit events per subscriber.
const EVENT_CAPACITY: usize = 16;

/// Outcome of [`KitManager::select_kit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitSelection {
    /// A kit is now active
    Selected(Kit),
    /// The user made no choice; the active kit is unchanged
    Cancelled,
    /// There is nothing to choose from, even after a rescan
    NoKitsAvailable,
}

/// Discovers, persists, and selects kits.
pub struct KitManager {
    store: KitStore,
    scanner: DirectoryScanner,
    state: Arc<dyn StateStore>,
    locator: Arc<dyn ToolchainLocator>,
    scan_dirs: Vec<PathBuf>,
    policy: MissingCompilerPolicy,
    kits: Vec<Kit>,
    active_kit: Option<Kit>,
    initialized: bool,
    events: broadcast::Sender<Option<Kit>>,
    watcher: Option<StoreWatcher>,
}

impl KitManager {
    /// Create a manager for the store at `store_path`.
    ///
    /// Nothing is read until [`initialize`](Self::initialize) is called.
    pub fn new(
        store_path: impl Into<PathBuf>,
        runner: Arc<dyn ProcessRunner>,
        state: Arc<dyn StateStore>,
        locator: Arc<dyn ToolchainLocator>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store: KitStore::new(store_path),
            scanner: DirectoryScanner::new(CompilerProbe::new(runner)),
            state,
            locator,
            scan_dirs: Vec::new(),
            policy: MissingCompilerPolicy::default(),
            kits: Vec::new(),
            active_kit: None,
            initialized: false,
            events,
            watcher: None,
        }
    }

    /// What a reload does when a kit's compiler has disappeared.
    pub fn with_policy(mut self, policy: MissingCompilerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Directories scanned alongside the toolchain directory.
    pub fn with_scan_dirs<P: Into<PathBuf>>(mut self, dirs: impl IntoIterator<Item = P>) -> Self {
        self.scan_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the probe used by rescans (e.g. to change its timeout).
    pub fn with_probe(mut self, probe: CompilerProbe) -> Self {
        self.scanner = DirectoryScanner::new(probe);
        self
    }

    /// The kit store this manager reads and writes.
    pub fn store(&self) -> &KitStore {
        &self.store
    }

    /// Known kits, sorted by name.
    pub fn kits(&self) -> &[Kit] {
        &self.kits
    }

    /// The active kit.
    pub fn active_kit(&self) -> Option<&Kit> {
        self.active_kit.as_ref()
    }

    /// Whether a kit is active.
    pub fn has_active_kit(&self) -> bool {
        self.active_kit.is_some()
    }

    /// Receive the new active kit (or `None`) every time it is set.
    pub fn subscribe(&self) -> broadcast::Receiver<Option<Kit>> {
        self.events.subscribe()
    }

    /// Load kits from the store, or scan for them if there is no store yet.
    pub async fn initialize(&mut self) -> Result<()> {
        debug!("Initializing kit manager for {:?}", self.store.path());
        if self.store.exists().await? {
            debug!("Re-reading kits file from prior session");
            self.reread_kits().await?;
        } else {
            self.rescan().await?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Scan the toolchain directory (and any extra scan directories) again
    /// and replace the stored kits.
    pub async fn rescan_for_kits(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        self.rescan().await
    }

    /// Choose the active kit interactively.
    ///
    /// With no known kits a rescan runs first; with exactly one kit it is
    /// selected without asking.
    pub async fn select_kit(&mut self, picker: &dyn KitPicker) -> Result<KitSelection> {
        self.ensure_initialized()?;
        info!("Start selection of kits. {} kits available.", self.kits.len());

        if self.kits.is_empty() {
            self.rescan().await?;
        }

        match self.kits.len() {
            0 => {
                info!("No kits available");
                return Ok(KitSelection::NoKitsAvailable);
            }
            1 => {
                info!("Only one kit, selected.");
                let kit = self.kits[0].clone();
                self.set_active_kit(Some(kit.clone()))?;
                return Ok(KitSelection::Selected(kit));
            }
            _ => {}
        }

        let choices: Vec<KitChoice> = self
            .kits
            .iter()
            .map(|kit| KitChoice {
                label: kit.label().to_string(),
                description: kit.description(),
            })
            .collect();

        let Some(index) = picker.pick(&choices).await? else {
            debug!("User cancelled kit selection");
            return Ok(KitSelection::Cancelled);
        };

        let Some(kit) = self.kits.get(index).cloned() else {
            cmkits_types::bug!(
                "kit picker returned index {} for {} choices",
                index,
                choices.len()
            );
        };

        debug!("User selected kit {}", kit.name);
        self.set_active_kit(Some(kit.clone()))?;
        Ok(KitSelection::Selected(kit))
    }

    /// Make the kit called `name` active. `None` if no such kit is known; the
    /// active kit is then left alone.
    pub async fn select_kit_by_name(&mut self, name: &str) -> Result<Option<Kit>> {
        self.ensure_initialized()?;
        debug!("Setting active kit by name: {}", name);

        let Some(kit) = self.kits.iter().find(|kit| kit.name == name).cloned() else {
            warn!("Kit set by name to non-existent kit: {}", name);
            return Ok(None);
        };

        self.set_active_kit(Some(kit.clone()))?;
        Ok(Some(kit))
    }

    /// Start reloading when the store file changes on disk.
    pub fn watch_store(&mut self) -> Result<()> {
        self.ensure_initialized()?;
        if self.watcher.is_none() {
            self.watcher = Some(StoreWatcher::new(self.store.path())?);
        }
        Ok(())
    }

    /// Wait for the store file to change, then reload it.
    ///
    /// Returns `false` when there is no watch (or it has stopped).
    pub async fn wait_for_store_change(&mut self) -> Result<bool> {
        self.ensure_initialized()?;
        let Some(watcher) = self.watcher.as_mut() else {
            return Ok(false);
        };
        if !watcher.changed().await {
            return Ok(false);
        }

        info!("Kits file changed, reloading");
        self.reread_kits().await?;
        Ok(true)
    }

    /// Reload if the store changed since the last check, without waiting.
    pub async fn process_store_events(&mut self) -> Result<bool> {
        self.ensure_initialized()?;
        let pending = self
            .watcher
            .as_mut()
            .map_or(false, StoreWatcher::take_pending);
        if pending {
            self.reread_kits().await?;
        }
        Ok(pending)
    }

    /// Stop watching and close the notification channel.
    pub fn dispose(self) {
        debug!("Disposing kit manager");
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(KitError::NotInitialized)
        }
    }

    async fn rescan(&mut self) -> Result<()> {
        debug!("Rescanning for kits");

        let root = self.locator.toolchain_root().await?;
        if root.is_none() {
            error!("Toolchain directory does not exist");
        }

        let dirs: Vec<PathBuf> = root.into_iter().chain(self.scan_dirs.iter().cloned()).collect();
        if dirs.is_empty() {
            self.store.save(&[]).await?;
            self.reread_kits().await?;
            return Ok(());
        }

        let discovered = self.scanner.scan_all(&dirs).await?;
        for kit in &discovered {
            info!("Found kit: {}", kit.name);
        }

        let kits = merge_kits(discovered);
        debug!("Saving {} kit(s) to {:?}", kits.len(), self.store.path());
        self.store.save(&kits).await?;

        // Normalise in-memory state to exactly what was written
        self.reread_kits().await
    }

    async fn reread_kits(&mut self) -> Result<()> {
        let mut usable = Vec::new();

        for kit in self.store.load().await {
            let Some(first) = kit.compilers().and_then(|compilers| compilers.values().next()) else {
                debug!("Skipping kit without compilers: {}", kit.name);
                continue;
            };

            if !exists(first).await? {
                warn!("Kit {} is removed: {:?} no longer exists", kit.name, first);
                match self.policy {
                    MissingCompilerPolicy::DiscardAll => {
                        usable.clear();
                        break;
                    }
                    MissingCompilerPolicy::DropKit => continue,
                }
            }

            usable.push(kit);
        }

        self.kits = usable;

        let active = self
            .state
            .active_kit_name()
            .and_then(|name| self.kits.iter().find(|kit| kit.name == name).cloned());
        self.set_active_kit(active)
    }

    fn set_active_kit(&mut self, kit: Option<Kit>) -> Result<()> {
        debug!(
            "Active kit set to {}",
            kit.as_ref().map_or("null", |kit| kit.name.as_str())
        );
        self.state
            .set_active_kit_name(kit.as_ref().map(|kit| kit.name.as_str()))?;
        self.active_kit = kit.clone();

        // No subscribers is fine
        let _ = self.events.send(kit);
        Ok(())
    }
}

/// Deduplicate by name (later kits win), drop the unspecified sentinel, and
/// sort by name.
pub fn merge_kits(kits: impl IntoIterator<Item = Kit>) -> Vec<Kit> {
    let mut by_name: HashMap<String, Kit> = HashMap::new();
    for kit in kits {
        by_name.insert(kit.name.clone(), kit);
    }

    let mut merged: Vec<Kit> = by_name
        .into_values()
        .filter(|kit| !kit.is_unspecified())
        .collect();
    merged.sort_by(|a, b| a.name.cmp(&b.name));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeGccRunner, FixedLocator, MockPicker, MockRunner};
    use cmkits_core::MemoryStateStore;
    use cmkits_types::KitIdentity;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        state: Arc<MemoryStateStore>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                state: Arc::new(MemoryStateStore::new()),
            }
        }

        fn bin(&self) -> PathBuf {
            self.dir.path().join("toolchain").join("bin")
        }

        fn store_path(&self) -> PathBuf {
            self.dir.path().join("data").join("cmake-kits.json")
        }

        fn install(&self, names: &[&str]) {
            std::fs::create_dir_all(self.bin()).unwrap();
            for name in names {
                std::fs::write(self.bin().join(name), "").unwrap();
            }
        }

        fn manager(&self) -> KitManager {
            KitManager::new(
                self.store_path(),
                Arc::new(FakeGccRunner {
                    version: "9.3.0".to_string(),
                }),
                self.state.clone(),
                Arc::new(FixedLocator(Some(self.bin()))),
            )
        }

        fn offline_manager(&self) -> KitManager {
            let mut runner = MockRunner::new();
            runner.expect_run().never();
            KitManager::new(
                self.store_path(),
                Arc::new(runner),
                self.state.clone(),
                Arc::new(FixedLocator(None)),
            )
        }

        async fn write_store(&self, kits: &[Kit]) {
            KitStore::new(self.store_path()).save(kits).await.unwrap();
        }

        fn gcc_kit(&self, name: &str, file: &str) -> Kit {
            Kit::with_compilers(name, self.bin(), [("C", self.bin().join(file))])
        }
    }

    #[tokio::test]
    async fn test_initialize_without_store_scans() {
        let fixture = Fixture::new();
        fixture.install(&["gcc", "arm-none-eabi-gcc", "ld"]);

        let mut manager = fixture.manager();
        manager.initialize().await.unwrap();

        let names: Vec<&str> = manager.kits().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["GCC 9.3.0", "GCC for arm-none-eabi 9.3.0"]);
        assert_eq!(KitStore::new(fixture.store_path()).load().await, manager.kits());
        assert!(!manager.has_active_kit());
    }

    #[tokio::test]
    async fn test_initialize_without_toolchain_writes_empty_store() {
        let fixture = Fixture::new();

        let mut manager = fixture.offline_manager();
        manager.initialize().await.unwrap();

        assert!(manager.kits().is_empty());
        let content = std::fs::read_to_string(fixture.store_path()).unwrap();
        assert_eq!(content, "[]");
    }

    #[tokio::test]
    async fn test_extra_scan_dirs_without_toolchain() {
        let fixture = Fixture::new();
        let extra = fixture.dir.path().join("opt").join("bin");
        std::fs::create_dir_all(&extra).unwrap();
        std::fs::write(extra.join("arm-none-eabi-gcc"), "").unwrap();

        let mut manager = KitManager::new(
            fixture.store_path(),
            Arc::new(FakeGccRunner {
                version: "9.3.0".to_string(),
            }),
            fixture.state.clone(),
            Arc::new(FixedLocator(None)),
        )
        .with_scan_dirs([extra.clone(), fixture.dir.path().join("missing")]);
        manager.initialize().await.unwrap();

        let names: Vec<&str> = manager.kits().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["GCC for arm-none-eabi 9.3.0"]);
        assert_eq!(
            manager.kits()[0].compilers().unwrap()["C"],
            extra.join("arm-none-eabi-gcc")
        );
    }

    #[tokio::test]
    async fn test_initialize_from_store_does_not_scan() {
        let fixture = Fixture::new();
        fixture.install(&["gcc"]);
        fixture.write_store(&[fixture.gcc_kit("GCC 9.3.0", "gcc")]).await;

        let mut manager = fixture.offline_manager();
        manager.initialize().await.unwrap();
        assert_eq!(manager.kits().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_compiler_discards_everything() {
        let fixture = Fixture::new();
        fixture.install(&["gcc"]);
        fixture
            .write_store(&[
                fixture.gcc_kit("A", "gcc"),
                fixture.gcc_kit("B", "vanished-gcc"),
                fixture.gcc_kit("C", "gcc"),
            ])
            .await;
        fixture.state.set_active_kit_name(Some("A")).unwrap();

        let mut manager = fixture.offline_manager();
        manager.initialize().await.unwrap();

        assert!(manager.kits().is_empty());
        assert!(manager.active_kit().is_none());
        assert_eq!(fixture.state.active_kit_name(), None);
    }

    #[tokio::test]
    async fn test_reload_checks_first_declared_compiler() {
        let fixture = Fixture::new();
        fixture.install(&["gcc"]);
        let declared = serde_json::json!([{
            "name": "GCC 9.3.0",
            "compilers": {
                "CXX": fixture.bin().join("vanished-g++"),
                "C": fixture.bin().join("gcc"),
            }
        }]);
        std::fs::create_dir_all(fixture.store_path().parent().unwrap()).unwrap();
        std::fs::write(fixture.store_path(), declared.to_string()).unwrap();

        let mut manager = fixture.offline_manager();
        manager.initialize().await.unwrap();

        // CXX comes first in the file, so its absence empties the catalog
        assert!(manager.kits().is_empty());
    }

    #[tokio::test]
    async fn test_missing_compiler_drop_kit_policy() {
        let fixture = Fixture::new();
        fixture.install(&["gcc"]);
        fixture
            .write_store(&[
                fixture.gcc_kit("A", "gcc"),
                fixture.gcc_kit("B", "vanished-gcc"),
                fixture.gcc_kit("C", "gcc"),
            ])
            .await;
        fixture.state.set_active_kit_name(Some("C")).unwrap();

        let mut manager = fixture
            .offline_manager()
            .with_policy(MissingCompilerPolicy::DropKit);
        manager.initialize().await.unwrap();

        let names: Vec<&str> = manager.kits().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(manager.active_kit().map(|k| k.name.as_str()), Some("C"));
    }

    #[tokio::test]
    async fn test_kits_without_compilers_are_not_loaded() {
        let fixture = Fixture::new();
        fixture.install(&["gcc"]);
        let vs = Kit::new(
            "Visual Studio Community 2017 - x86",
            KitIdentity::VisualStudio {
                instance_id: "a1b2c3".to_string(),
                architecture: "x86".to_string(),
            },
        );
        let toolchain = Kit::new("arm", KitIdentity::ToolchainFile(PathBuf::from("/tc.cmake")));
        fixture
            .write_store(&[vs, toolchain, fixture.gcc_kit("GCC 9.3.0", "gcc")])
            .await;

        let mut manager = fixture.offline_manager();
        manager.initialize().await.unwrap();

        let names: Vec<&str> = manager.kits().iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, vec!["GCC 9.3.0"]);
    }

    #[tokio::test]
    async fn test_not_initialized() {
        let fixture = Fixture::new();
        let mut manager = fixture.offline_manager();

        assert!(matches!(
            manager.select_kit_by_name("x").await,
            Err(KitError::NotInitialized)
        ));
        assert!(matches!(
            manager.rescan_for_kits().await,
            Err(KitError::NotInitialized)
        ));
        assert!(matches!(manager.watch_store(), Err(KitError::NotInitialized)));
    }

    #[tokio::test]
    async fn test_select_by_unknown_name_keeps_active() {
        let fixture = Fixture::new();
        fixture.install(&["gcc", "x86_64-w64-mingw32-gcc"]);

        let mut manager = fixture.manager();
        manager.initialize().await.unwrap();
        manager.select_kit_by_name("GCC 9.3.0").await.unwrap().unwrap();

        let mut events = manager.subscribe();
        assert_eq!(manager.select_kit_by_name("MSVC 6.0").await.unwrap(), None);
        assert_eq!(manager.active_kit().map(|k| k.name.as_str()), Some("GCC 9.3.0"));
        assert_eq!(fixture.state.active_kit_name().as_deref(), Some("GCC 9.3.0"));
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_select_by_name_notifies() {
        let fixture = Fixture::new();
        fixture.install(&["gcc", "x86_64-w64-mingw32-gcc"]);

        let mut manager = fixture.manager();
        manager.initialize().await.unwrap();
        let mut events = manager.subscribe();

        let kit = manager
            .select_kit_by_name("GCC for x86_64-w64-mingw32 9.3.0")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(events.recv().await.unwrap(), Some(kit.clone()));
        assert_eq!(manager.active_kit(), Some(&kit));
        assert_eq!(fixture.state.active_kit_name(), Some(kit.name));
    }

    #[tokio::test]
    async fn test_select_single_kit_without_asking() {
        let fixture = Fixture::new();
        fixture.install(&["gcc"]);

        let mut manager = fixture.manager();
        manager.initialize().await.unwrap();

        let mut picker = MockPicker::new();
        picker.expect_pick().never();

        match manager.select_kit(&picker).await.unwrap() {
            KitSelection::Selected(kit) => assert_eq!(kit.name, "GCC 9.3.0"),
            other => panic!("unexpected selection: {:?}", other),
        }
        assert!(manager.has_active_kit());
    }

    #[tokio::test]
    async fn test_select_rescans_when_empty() {
        let fixture = Fixture::new();

        let mut manager = fixture.manager();
        manager.initialize().await.unwrap();
        assert!(manager.kits().is_empty());

        fixture.install(&["gcc"]);
        let mut picker = MockPicker::new();
        picker.expect_pick().never();

        let selection = manager.select_kit(&picker).await.unwrap();
        assert!(matches!(selection, KitSelection::Selected(_)));
    }

    #[tokio::test]
    async fn test_select_with_nothing_available() {
        let fixture = Fixture::new();

        let mut manager = fixture.offline_manager();
        manager.initialize().await.unwrap();

        let mut picker = MockPicker::new();
        picker.expect_pick().never();
        assert_eq!(
            manager.select_kit(&picker).await.unwrap(),
            KitSelection::NoKitsAvailable
        );
    }

    #[tokio::test]
    async fn test_interactive_choice_and_cancel() {
        let fixture = Fixture::new();
        fixture.install(&["gcc", "arm-none-eabi-gcc"]);

        let mut manager = fixture.manager();
        manager.initialize().await.unwrap();

        let mut picker = MockPicker::new();
        picker
            .expect_pick()
            .withf(|choices| {
                choices.len() == 2
                    && choices[1].label == "GCC for arm-none-eabi 9.3.0"
                    && choices[1].description.starts_with("Using compilers: C = ")
            })
            .times(1)
            .returning(|_| Ok(Some(1)));

        let selection = manager.select_kit(&picker).await.unwrap();
        let KitSelection::Selected(kit) = selection else {
            panic!("expected a selection");
        };
        assert_eq!(kit.name, "GCC for arm-none-eabi 9.3.0");

        let mut cancelling = MockPicker::new();
        cancelling.expect_pick().times(1).returning(|_| Ok(None));
        assert_eq!(
            manager.select_kit(&cancelling).await.unwrap(),
            KitSelection::Cancelled
        );
        assert_eq!(manager.active_kit(), Some(&kit));
    }

    #[tokio::test]
    async fn test_active_kit_restored_by_new_instance() {
        let fixture = Fixture::new();
        fixture.install(&["gcc", "arm-none-eabi-gcc"]);

        let mut first = fixture.manager();
        first.initialize().await.unwrap();
        first.select_kit_by_name("GCC 9.3.0").await.unwrap();
        first.dispose();

        let mut second = fixture.offline_manager();
        let mut events = second.subscribe();
        second.initialize().await.unwrap();

        assert_eq!(second.active_kit().map(|k| k.name.as_str()), Some("GCC 9.3.0"));
        let announced = events.recv().await.unwrap();
        assert_eq!(announced.map(|k| k.name), Some("GCC 9.3.0".to_string()));
    }

    #[tokio::test]
    async fn test_rescan_drops_stale_active_kit() {
        let fixture = Fixture::new();
        fixture.install(&["gcc", "arm-none-eabi-gcc"]);

        let mut manager = fixture.manager();
        manager.initialize().await.unwrap();
        manager
            .select_kit_by_name("GCC for arm-none-eabi 9.3.0")
            .await
            .unwrap();

        std::fs::remove_file(fixture.bin().join("arm-none-eabi-gcc")).unwrap();
        manager.rescan_for_kits().await.unwrap();

        assert_eq!(manager.kits().len(), 1);
        assert!(manager.active_kit().is_none());
        assert_eq!(fixture.state.active_kit_name(), None);
    }

    #[tokio::test]
    async fn test_store_watch_reloads() {
        let fixture = Fixture::new();
        fixture.install(&["gcc"]);

        let mut manager = fixture.manager();
        manager.initialize().await.unwrap();
        manager.watch_store().unwrap();
        assert!(!manager.process_store_events().await.unwrap());

        fixture
            .write_store(&[
                fixture.gcc_kit("GCC 9.3.0", "gcc"),
                fixture.gcc_kit("Hand-written", "gcc"),
            ])
            .await;

        let changed = tokio::time::timeout(
            Duration::from_secs(5),
            manager.wait_for_store_change(),
        )
        .await
        .unwrap()
        .unwrap();
        assert!(changed);
        assert_eq!(manager.kits().len(), 2);
    }

    #[tokio::test]
    async fn test_dispose_closes_channel() {
        let fixture = Fixture::new();
        let mut manager = fixture.offline_manager();
        manager.initialize().await.unwrap();

        let mut events = manager.subscribe();
        manager.dispose();
        assert!(matches!(
            events.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }

    #[test]
    fn test_merge_kits_last_writer_wins() {
        let first = Kit::with_compilers("GCC 9.3.0", "/a", [("C", "/a/gcc")]);
        let second = Kit::with_compilers("GCC 9.3.0", "/b", [("C", "/b/gcc")]);
        let clang = Kit::with_compilers("Clang 14.0.0", "/b", [("C", "/b/clang")]);

        let merged = merge_kits(vec![first, Kit::unspecified(), clang.clone(), second.clone()]);
        assert_eq!(merged, vec![clang, second]);
        assert!(merged.iter().all(|k| k.toolchain_binary_path != Path::new("/a")));
    }
}
