use std::{
    io,
    path::{
        Path,
        PathBuf,
    },
};

use crate::{
    CrewReport,
    CrewReportConsumer,
    DirWalker,
    PathEx,
    ScanNotice,
    TargetNames,
};

#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Matched directories, sorted by path.
    pub candidates: Vec<PathBuf>,
    pub notices: Vec<ScanNotice>,
}

/// Searches a directory tree for directories named like one of the targets.
///
/// Matched directories are never entered, so nothing beneath a match is reported.
/// Symbolic links are not followed.
pub struct SweeperCrew<'a> {
    targets: &'a TargetNames,
}

impl<'a> SweeperCrew<'a> {
    pub fn new(targets: &'a TargetNames) -> Self {
        Self { targets }
    }

    pub fn search(
        &self,
        root_directory: &Path,
        report_consumer: &mut dyn CrewReportConsumer,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        report_consumer.consume_report(CrewReport::StatusInspecting(root_directory));
        if root_directory
            .base_name()
            .map_or(false, |name| self.targets.contains(name))
        {
            log::trace!("Root {} is a target itself", root_directory.display());
            report_consumer.consume_report(CrewReport::Found(root_directory));
            outcome.candidates.push(root_directory.to_owned());
            return outcome;
        }

        let mut dir_walker = DirWalker::new();
        Self::expand(
            &mut dir_walker,
            root_directory,
            &mut outcome,
            report_consumer,
        );

        while let Some(item) = dir_walker.next_item() {
            let item_path = item.path();
            match item.file_type() {
                Ok(file_type) if file_type.is_dir() => {}
                Ok(_) => continue,
                Err(error) => {
                    Self::notice(&item_path, error, &mut outcome, report_consumer);
                    continue;
                }
            }

            report_consumer.consume_report(CrewReport::StatusInspecting(&item_path));

            let item_name = item.file_name();
            let matched = item_name
                .to_str()
                .map_or(false, |name| self.targets.contains(name));

            if matched {
                log::trace!("Identified new target {}", item_path.display());
                report_consumer.consume_report(CrewReport::Found(&item_path));
                outcome.candidates.push(item_path);
                continue;
            }

            Self::expand(&mut dir_walker, &item_path, &mut outcome, report_consumer);
        }

        outcome.candidates.sort();
        outcome
    }

    fn expand(
        dir_walker: &mut DirWalker,
        path: &Path,
        outcome: &mut SearchOutcome,
        report_consumer: &mut dyn CrewReportConsumer,
    ) {
        let mut notices = Vec::new();
        let result = dir_walker.insert_entries(path, |error| notices.push(error));
        if let Err(error) = result {
            log::warn!("Failed to read directory {}: {:#}", path.display(), error);
            notices.push(error);
        }

        for error in notices {
            Self::notice(path, error, outcome, report_consumer);
        }
    }

    fn notice(
        path: &Path,
        error: io::Error,
        outcome: &mut SearchOutcome,
        report_consumer: &mut dyn CrewReportConsumer,
    ) {
        let notice = ScanNotice {
            path: path.to_owned(),
            error,
        };
        report_consumer.consume_report(CrewReport::ErrorFs(&notice));
        outcome.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::VoidCrewReportConsumer;

    fn targets(names: &[&str]) -> TargetNames {
        TargetNames::from_names(names.iter()).unwrap()
    }

    #[test]
    fn finds_targets_and_prunes_matches() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("node_modules/pkg/node_modules")).unwrap();
        fs::create_dir_all(root.path().join("sub/dist/inner/dist")).unwrap();
        fs::create_dir_all(root.path().join("sub/src")).unwrap();
        fs::write(root.path().join("dist"), b"a file named like a target").unwrap();

        let targets = targets(&["node_modules", "dist"]);
        let outcome =
            SweeperCrew::new(&targets).search(root.path(), &mut VoidCrewReportConsumer);

        assert_eq!(
            outcome.candidates,
            vec![
                root.path().join("node_modules"),
                root.path().join("sub/dist"),
            ]
        );
        assert!(outcome.notices.is_empty());
    }

    #[test]
    fn matching_root_is_not_entered() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("target");
        fs::create_dir_all(target.join("debug/target")).unwrap();

        let targets = targets(&["target"]);
        let outcome = SweeperCrew::new(&targets).search(&target, &mut VoidCrewReportConsumer);

        assert_eq!(outcome.candidates, vec![target]);
    }

    #[test]
    fn nothing_found() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a/b/c")).unwrap();

        let targets = targets(&["node_modules"]);
        let outcome =
            SweeperCrew::new(&targets).search(root.path(), &mut VoidCrewReportConsumer);

        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn unreadable_root_becomes_notice() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing");

        let targets = targets(&["node_modules"]);
        let outcome = SweeperCrew::new(&targets).search(&missing, &mut VoidCrewReportConsumer);

        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].path, missing);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let outside = tempfile::tempdir().unwrap();
        fs::create_dir_all(outside.path().join("node_modules")).unwrap();

        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), root.path().join("linked")).unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("node_modules"),
            root.path().join("node_modules"),
        )
        .unwrap();

        let targets = targets(&["node_modules"]);
        let outcome =
            SweeperCrew::new(&targets).search(root.path(), &mut VoidCrewReportConsumer);

        assert!(outcome.candidates.is_empty());
    }

    /// Removes a directory as soon as the walker announces it, so reading it fails.
    struct RemoveOnInspect(PathBuf);
    impl CrewReportConsumer for RemoveOnInspect {
        fn consume_report(&mut self, report: CrewReport<'_>) {
            if let CrewReport::StatusInspecting(path) = report {
                if path == self.0 {
                    fs::remove_dir_all(path).unwrap();
                }
            }
        }
    }

    #[test]
    fn vanished_directory_becomes_notice_and_walk_continues() {
        let root = tempfile::tempdir().unwrap();
        let gone = root.path().join("gone");
        fs::create_dir_all(gone.join("dist")).unwrap();
        fs::create_dir_all(root.path().join("ok/dist")).unwrap();
        fs::create_dir_all(root.path().join("zz/dist")).unwrap();

        let targets = targets(&["dist"]);
        let outcome = SweeperCrew::new(&targets)
            .search(root.path(), &mut RemoveOnInspect(gone.clone()));

        assert_eq!(
            outcome.candidates,
            vec![root.path().join("ok/dist"), root.path().join("zz/dist")]
        );
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].path, gone);
        assert_eq!(outcome.notices[0].error.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_sibling_becomes_notice_and_walk_continues() {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir().unwrap();
        let locked = root.path().join("locked");
        fs::create_dir_all(locked.join("dist")).unwrap();
        fs::create_dir_all(root.path().join("ok/dist")).unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            /* Permissions are not enforced (e.g. running as root) */
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let targets = targets(&["dist"]);
        let outcome =
            SweeperCrew::new(&targets).search(root.path(), &mut VoidCrewReportConsumer);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(outcome.candidates, vec![root.path().join("ok/dist")]);
        assert_eq!(outcome.notices.len(), 1);
        assert_eq!(outcome.notices[0].path, locked);
        assert_eq!(
            outcome.notices[0].error.kind(),
            io::ErrorKind::PermissionDenied
        );
    }

    #[test]
    fn reports_found_paths() {
        struct Collect(Vec<PathBuf>);
        impl CrewReportConsumer for Collect {
            fn consume_report(&mut self, report: CrewReport<'_>) {
                if let CrewReport::Found(path) = report {
                    self.0.push(path.to_owned());
                }
            }
        }

        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("x/.venv")).unwrap();

        let targets = targets(&[".venv"]);
        let mut consumer = Collect(Vec::new());
        SweeperCrew::new(&targets).search(root.path(), &mut consumer);

        assert_eq!(consumer.0, vec![root.path().join("x/.venv")]);
    }
}
