use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Every flag name the simulator programs recognise. Flag sets are checked
/// against this schema when they are built, long before a process is
/// spawned, so a typo in a flag name fails the sweep up front instead of
/// silently producing a mis-parameterised simulation.
pub const SIM_FLAG_SCHEMA: &[&str] = &[
    // Sweep program flags
    "Datarate",
    "appDuration",
    "arUeNum",
    "vrUeNum",
    "cgUeNum",
    "enableOfdma",
    "schedulerType",
    "CGgbrDL",
    // Single-scenario program flags
    "ueNumPergNb",
    "gbrDlVec",
    "mbrDlVec",
    "fiveQiVec",
    "ueTypeVec",
    "packetSizeVec",
    "lambdaVec",
    "simTime",
    "outputDir",
    "gNbNum",
    "logging",
    "numerology",
    "centralFrequency",
    "bandwidth",
    "totalTxPower",
    "priorityTrafficScenario",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    #[error("unknown simulator flag '{0}'")]
    Unknown(String),
    #[error("simulator flag '{0}' set more than once")]
    Duplicate(String),
}

/// An ordered set of `--name=value` simulator flags.
///
/// Order is preserved so the rendered argument string is reproducible for a
/// given sequence of `set` calls. Booleans render as lowercase
/// `true`/`false`, which is what the simulator's option parser expects.
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    flags: Vec<(&'static str, String)>,
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl fmt::Display) -> Result<(), FlagError> {
        if !SIM_FLAG_SCHEMA.contains(&name) {
            return Err(FlagError::Unknown(name.to_string()));
        }
        if self.flags.iter().any(|(n, _)| *n == name) {
            return Err(FlagError::Duplicate(name.to_string()));
        }
        self.flags.push((name, value.to_string()));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Render as the space-joined `--name=value` string the ns-3 wrapper
    /// passes to the program.
    pub fn to_arg_string(&self) -> String {
        self.flags
            .iter()
            .map(|(name, value)| format!("--{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A fully built simulator invocation: `<ns3> run "<program> <flags>"`.
///
/// The ns-3 wrapper takes the program name and all of its flags as a single
/// argument after `run`, so that is the shape produced here.
#[derive(Debug, Clone)]
pub struct SimCommand {
    binary: PathBuf,
    program: String,
    flags: FlagSet,
}

impl SimCommand {
    pub fn new(binary: PathBuf, program: impl Into<String>, flags: FlagSet) -> Self {
        Self {
            binary,
            program: program.into(),
            flags,
        }
    }

    pub fn run_arg(&self) -> String {
        format!("{} {}", self.program, self.flags.to_arg_string())
    }

    /// Build the process to spawn. Simulator output goes to a null sink;
    /// results are read from the files the simulator writes, never from its
    /// stdout.
    pub fn to_std_command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("run")
            .arg(self.run_arg())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl fmt::Display for SimCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} run \"{}\"", self.binary.display(), self.run_arg())
    }
}
