/// Tests for the mock controller driven through a recording fake runner
#[cfg(test)]
mod controller_tests {
    use parking_lot::Mutex;
    use review_mock::{
        rpmlint::LintErrorCheck,
        sandbox::{CommandLine, CommandRunner, ProcessResult},
        Mock, MockError, Settings,
    };
    use std::collections::HashSet;
    use std::io;
    use std::path::{Path, PathBuf};
    use tempfile::{tempdir, TempDir};

    #[derive(Default)]
    struct FakeRunner {
        installed: HashSet<String>,
        mock_exit: i32,
        mock_output: String,
        mock_missing: bool,
        script_output: Option<String>,
        calls: Mutex<Vec<CommandLine>>,
    }

    impl FakeRunner {
        fn calls(&self) -> Vec<CommandLine> {
            self.calls.lock().clone()
        }

        fn calls_to(&self, program: &str) -> Vec<CommandLine> {
            self.calls()
                .into_iter()
                .filter(|c| c.program == program)
                .collect()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(&self, cmd: &CommandLine) -> io::Result<ProcessResult> {
            self.calls.lock().push(cmd.clone());
            match cmd.program.as_str() {
                "rpm" => {
                    let name = cmd.args.last().cloned().unwrap_or_default();
                    Ok(ProcessResult {
                        exit_code: if self.installed.contains(&name) { 0 } else { 1 },
                        output: String::new(),
                    })
                }
                "mock" if self.mock_missing => {
                    Err(io::Error::new(io::ErrorKind::NotFound, "mock: not found"))
                }
                "mock" => Ok(ProcessResult {
                    exit_code: self.mock_exit,
                    output: self.mock_output.clone(),
                }),
                "sh" => match &self.script_output {
                    Some(output) => Ok(ProcessResult {
                        exit_code: 0,
                        output: output.clone(),
                    }),
                    None => Err(io::Error::new(io::ErrorKind::NotFound, "sh: not found")),
                },
                _ => Ok(ProcessResult::default()),
            }
        }
    }

    fn setup(runner: FakeRunner) -> (TempDir, Mock<FakeRunner>) {
        let tmp = tempdir().expect("Failed to create temp dir");
        let config_dir = tmp.path().join("etc/mock");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("default.cfg"),
            "config_opts['root'] = 'fedora-40-x86_64'\nconfig_opts['target_arch'] = 'x86_64'\n",
        )
        .unwrap();

        let settings = Settings {
            config_dir,
            state_root: tmp.path().join("var/lib/mock"),
            resultdir: Some(tmp.path().join("results")),
            ..Default::default()
        };
        (tmp, Mock::with_runner(settings, runner))
    }

    fn installed(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_install_skips_already_installed() {
        let (_tmp, mock) = setup(FakeRunner {
            installed: installed(&["a"]),
            ..Default::default()
        });

        let mut rpms = vec![PathBuf::from("a-1.0-1.rpm"), PathBuf::from("b-2.0-1.rpm")];
        mock.install(&mut rpms).expect("install should succeed");

        assert_eq!(rpms, vec![PathBuf::from("b-2.0-1.rpm")]);
        let mock_calls = mock.runner().calls_to("mock");
        assert_eq!(mock_calls.len(), 1);
        let args = &mock_calls[0].args;
        assert_eq!(args.last().map(String::as_str), Some("b-2.0-1.rpm"));
        assert!(!args.iter().any(|a| a == "a-1.0-1.rpm"));
        assert!(args.contains(&"install".to_string()));
    }

    #[test]
    fn test_install_queries_chroot_rpmdb() {
        let (tmp, mock) = setup(FakeRunner::default());
        let mut rpms = vec![PathBuf::from("/srv/foo-1.0-1.fc40.noarch.rpm")];
        mock.install(&mut rpms).unwrap();

        let query = &mock.runner().calls_to("rpm")[0];
        let dbpath = tmp.path().join("var/lib/mock/fedora-40-x86_64/root/var/lib/rpm");
        assert_eq!(
            query.args,
            vec![
                "--dbpath".to_string(),
                dbpath.to_string_lossy().into_owned(),
                "-q".to_string(),
                "foo".to_string(),
            ]
        );
        assert!(dbpath.is_dir());
    }

    #[test]
    fn test_install_nothing_left_runs_no_mock() {
        let (_tmp, mock) = setup(FakeRunner {
            installed: installed(&["a", "b"]),
            ..Default::default()
        });

        let mut rpms = vec![PathBuf::from("a-1.0-1.rpm"), PathBuf::from("b-2.0-1.rpm")];
        assert!(mock.install(&mut rpms).is_ok());
        assert!(rpms.is_empty());
        assert!(mock.runner().calls_to("mock").is_empty());
    }

    #[test]
    fn test_install_failure_returns_transcript() {
        let (_tmp, mock) = setup(FakeRunner {
            mock_exit: 30,
            mock_output: "No match for argument: b\n".to_string(),
            ..Default::default()
        });

        let mut rpms = vec![PathBuf::from("b-2.0-1.rpm")];
        let err = mock.install(&mut rpms).unwrap_err();
        assert!(matches!(err, MockError::CommandFailed { code: 30, .. }));
        assert_eq!(err.output(), "No match for argument: b\n");
    }

    #[test]
    fn test_install_launch_failure() {
        let (_tmp, mock) = setup(FakeRunner {
            mock_missing: true,
            ..Default::default()
        });

        let mut rpms = vec![PathBuf::from("b-2.0-1.rpm")];
        let err = mock.install(&mut rpms).unwrap_err();
        assert!(matches!(err, MockError::Launch { .. }));
    }

    #[test]
    fn test_install_command_shape_with_config() {
        let (tmp, _) = setup(FakeRunner::default());
        std::fs::write(
            tmp.path().join("etc/mock/epel-9-x86_64.cfg"),
            "config_opts['root'] = 'epel-9-x86_64'\n",
        )
        .unwrap();
        let settings = Settings {
            mock_config: Some("epel-9-x86_64".to_string()),
            mock_options: Some("--no-clean".to_string()),
            resultdir: Some(PathBuf::from("/srv/results")),
            config_dir: tmp.path().join("etc/mock"),
            state_root: tmp.path().join("var/lib/mock"),
            ..Default::default()
        };
        let mock = Mock::with_runner(settings, FakeRunner::default());

        let mut rpms = vec![PathBuf::from("b-2.0-1.rpm")];
        mock.install(&mut rpms).unwrap();
        assert_eq!(
            mock.runner().calls_to("mock")[0].to_string(),
            "mock -r epel-9-x86_64 --no-clean --resultdir=/srv/results install b-2.0-1.rpm"
        );
    }

    #[test]
    fn test_init() {
        let (_tmp, mock) = setup(FakeRunner::default());
        assert!(mock.init().is_ok());
        assert_eq!(mock.runner().calls()[0].to_string(), "mock --init");

        let (_tmp, mock) = setup(FakeRunner {
            mock_exit: 1,
            mock_output: "ERROR: init failed\n".to_string(),
            ..Default::default()
        });
        assert_eq!(mock.init().unwrap_err().output(), "ERROR: init failed\n");
    }

    #[test]
    fn test_missing_config_fails_install() {
        let tmp = tempdir().unwrap();
        let settings = Settings {
            config_dir: tmp.path().to_path_buf(),
            state_root: tmp.path().join("state"),
            ..Default::default()
        };
        let mock = Mock::with_runner(settings, FakeRunner::default());

        let mut rpms = vec![PathBuf::from("b-2.0-1.rpm")];
        let err = mock.install(&mut rpms).unwrap_err();
        assert!(matches!(err, MockError::Config { .. }));
        assert!(mock.runner().calls().is_empty());
    }

    #[test]
    fn test_lint_scrapes_report() {
        let (_tmp, mock) = setup(FakeRunner {
            installed: installed(&["rpmlint"]),
            script_output: Some(
                "noise\nrpmlint:\n<mock-chroot> # pkg.rpm: W: some-warning\nrpmlint-done:\ntrailing"
                    .to_string(),
            ),
            ..Default::default()
        });

        let report = mock.lint(&[PathBuf::from("pkg-1.0-1.noarch.rpm")]);
        assert!(report.success);
        assert_eq!(report.text, "# pkg.rpm: W: some-warning\n");
        assert!(mock.runner().calls_to("mock").is_empty());
    }

    #[test]
    fn test_lint_script_names_are_unique() {
        let (_tmp, mock) = setup(FakeRunner {
            installed: installed(&["rpmlint"]),
            script_output: Some("rpmlint:\nrpmlint-done:\n".to_string()),
            ..Default::default()
        });

        mock.lint(&[
            PathBuf::from("/r/foo-1.0-1.x86_64.rpm"),
            PathBuf::from("/r/foo-1.0-1.src.rpm"),
            PathBuf::from("/r/foo-devel-1.0-1.x86_64.rpm"),
        ]);

        let script = &mock.runner().calls_to("sh")[0].args[1];
        assert!(script.contains("rpmlint foo foo-devel\n"));
        assert!(script.contains("mock   --shell"));
    }

    #[test]
    fn test_lint_install_failure_short_circuits() {
        let (_tmp, mock) = setup(FakeRunner {
            mock_exit: 1,
            mock_output: "cannot install rpmlint\n".to_string(),
            script_output: Some("rpmlint:\nrpmlint-done:\n".to_string()),
            ..Default::default()
        });

        let report = mock.lint(&[PathBuf::from("foo-1.0-1.noarch.rpm")]);
        assert!(!report.success);
        assert_eq!(report.text, "cannot install rpmlint\n");
        assert!(mock.runner().calls_to("sh").is_empty());
    }

    #[test]
    fn test_lint_detected_error_marker() {
        let (_tmp, mock) = setup(FakeRunner {
            installed: installed(&["rpmlint"]),
            script_output: Some(
                "rpmlint:\nERROR: Command failed:\nrpmlint-done:\n".to_string(),
            ),
            ..Default::default()
        });

        let report = mock.lint(&[PathBuf::from("foo-1.0-1.noarch.rpm")]);
        assert!(!report.success);
        assert_eq!(report.text, "ERROR: Command failed:");
    }

    struct AlwaysBroken;

    impl LintErrorCheck for AlwaysBroken {
        fn check(&self, _output: &str) -> Option<String> {
            Some("rpmlint crashed".to_string())
        }
    }

    #[test]
    fn test_lint_custom_check_overrides_sentinels() {
        let (_tmp, mock) = setup(FakeRunner {
            installed: installed(&["rpmlint"]),
            script_output: Some("rpmlint:\nfine\nrpmlint-done:\n".to_string()),
            ..Default::default()
        });
        let mock = mock.with_lint_check(AlwaysBroken);

        let report = mock.lint(&[PathBuf::from("foo-1.0-1.noarch.rpm")]);
        assert!(!report.success);
        assert_eq!(report.text, "rpmlint crashed");
    }

    #[test]
    fn test_lint_launch_failure() {
        let (_tmp, mock) = setup(FakeRunner {
            installed: installed(&["rpmlint"]),
            script_output: None,
            ..Default::default()
        });

        let report = mock.lint(&[PathBuf::from("foo-1.0-1.noarch.rpm")]);
        assert!(!report.success);
        assert_eq!(report.text, "sh: not found\n");
    }

    #[test]
    fn test_lint_summary_attached() {
        let (_tmp, mock) = setup(FakeRunner {
            installed: installed(&["rpmlint"]),
            script_output: Some(
                "rpmlint:\nfoo.noarch: W: no-documentation\n1 packages and 0 specfiles checked; 0 errors, 1 warnings.\nrpmlint-done:\n"
                    .to_string(),
            ),
            ..Default::default()
        });

        let report = mock.lint(&[PathBuf::from("foo-1.0-1.noarch.rpm")]);
        assert!(report.success);
        let summary = report.summary.expect("summary should be parsed");
        assert_eq!(summary.warnings, 1);
        assert!(!report.is_clean());
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_has_cached_build_uses_result_dir() {
        let (tmp, mock) = setup(FakeRunner::default());
        let results = tmp.path().join("results");

        touch(&results, "foo-1.0-1.src.rpm");
        assert!(!mock.has_cached_build("foo"));

        touch(&results, "foo-1.0-1.x86_64.rpm");
        touch(&results, "foo-debuginfo-1.0-1.x86_64.rpm");
        assert!(mock.has_cached_build("foo"));
        assert!(mock.runner().calls().is_empty());
    }

    #[test]
    fn test_cleanup_builddir_removes_dangling_link() {
        let (_tmp, mock) = setup(FakeRunner::default());
        let build = mock.builddir(Some("BUILD")).unwrap();
        std::fs::create_dir_all(&build).unwrap();

        let valid = build.join("foo-1.0");
        std::fs::write(&valid, b"source").unwrap();
        let dangling = build.join("stale");
        std::os::unix::fs::symlink(build.join("missing-target"), &dangling).unwrap();

        mock.cleanup_builddir();

        let remaining: Vec<PathBuf> = std::fs::read_dir(&build)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(remaining, vec![valid]);
    }

    #[test]
    fn test_cleanup_without_config_is_silent() {
        let tmp = tempdir().unwrap();
        let settings = Settings {
            config_dir: tmp.path().to_path_buf(),
            state_root: tmp.path().join("state"),
            ..Default::default()
        };
        let mock = Mock::with_runner(settings, FakeRunner::default());
        mock.cleanup_builddir();
        assert!(!tmp.path().join("state").exists());
    }
}
