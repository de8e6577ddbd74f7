/// Crate `config` provides sampler's configuration and CLI.
use {
    crate::types::SamplingError,
    std::{env, path::PathBuf},
};

const HELP: &str = "\
USAGE:
  yasa [FLAGS] [OPTIONS] <cnf-file>
FLAGS:
  -h, --help            Prints help information
  -q, --quiet           Disables any progress message
  -v, --verbose         Emits debug messages
      --keep-initial    Forbids the sampler to modify initial configurations
      --seed-counts     Initial configurations count towards the limit
  -V, --version         Prints version information
OPTIONS:
  -t <t>                Interaction strength                          [default: 2]
  -i, --iterations <n>  Number of passes (negative: until cancelled)   [default: 2]
  -l, --limit <n>       Maximum number of configurations              [default: unlimited]
      --internal-limit <n>
                        Capacity of the rolling solution cache        [default: 100000]
  -s, --seed <n>        Random seed                                   [default: 1]
      --conflict-limit <n>
                        Conflict budget per solver call; 0 for none   [default: 0]
      --timeout <sec>   Stop and keep the best sample; 0 for none     [default: 0]
      --initial <file>  Initial sample, one configuration per line
  -o, --output <file>   Result filename                               [default: stdout]
ARGS:
  <cnf-file>            DIMACS CNF file";

/// Configuration built from command line options
#[derive(Clone, Debug)]
pub struct Config {
    //
    //## I/O configuration
    //
    /// CNF file in DIMACS format
    pub cnf_file: PathBuf,

    /// Initial sample file
    pub initial_sample_file: Option<PathBuf>,

    /// Result filename/stdout
    pub result_file: Option<PathBuf>,

    /// Disable any progress message
    pub quiet_mode: bool,

    /// Emit debug messages
    pub verbose: bool,

    //
    //## sampler
    //
    /// Interaction strength
    pub t: usize,

    /// Number of passes; negative values mean 'until cancelled'
    pub iterations: isize,

    /// Maximum number of configurations
    pub configuration_limit: usize,

    /// Capacity of the rolling cache of solver solutions
    pub internal_solution_limit: usize,

    /// The sampler may add literals to initial configurations
    pub allow_change_to_initial_sample: bool,

    /// Initial configurations count towards `configuration_limit`
    pub initial_sample_counts_towards_limit: bool,

    /// Random seed for combination order and solver selection
    pub seed: u64,

    /// Wall clock limit in seconds; 0 for no limit
    pub timeout: f64,

    //
    //## solver
    //
    /// Conflict budget per solver call; 0 for no limit
    pub solver_conflict_limit: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            cnf_file: PathBuf::new(),
            initial_sample_file: None,
            result_file: None,
            quiet_mode: false,
            verbose: false,
            t: 2,
            iterations: 2,
            configuration_limit: usize::MAX,
            internal_solution_limit: 100_000,
            allow_change_to_initial_sample: true,
            initial_sample_counts_towards_limit: false,
            seed: 1,
            timeout: 0.0,
            solver_conflict_limit: 0,
        }
    }
}

impl<T> From<T> for Config
where
    PathBuf: From<T>,
{
    fn from(path: T) -> Config {
        Config {
            cnf_file: PathBuf::from(path),
            ..Config::default()
        }
    }
}

macro_rules! parse_value {
    ($iter: expr, $flag: expr) => {
        match $iter.next().map(|s| s.parse()) {
            Some(Ok(v)) => v,
            _ => {
                return Err(SamplingError::InvalidParameter(format!(
                    "{} requires a numeric value",
                    $flag
                )))
            }
        }
    };
}

impl Config {
    /// check the sampler parameters.
    ///
    /// # Errors
    ///
    /// `SamplingError::InvalidParameter` on `t < 1`, `iterations == 0` or
    /// a negative timeout.
    pub fn validate(&self) -> Result<(), SamplingError> {
        if self.t < 1 {
            return Err(SamplingError::InvalidParameter(format!(
                "t must be greater than 0, but was {}",
                self.t
            )));
        }
        if self.iterations == 0 {
            return Err(SamplingError::InvalidParameter(
                "iterations must not be 0".to_string(),
            ));
        }
        if self.timeout.is_nan() || self.timeout < 0.0 {
            return Err(SamplingError::InvalidParameter(format!(
                "timeout must not be negative, but was {}",
                self.timeout
            )));
        }
        Ok(())
    }
    /// return the number of passes; `usize::MAX` stands for 'unbounded'.
    pub fn num_passes(&self) -> usize {
        if self.iterations < 0 {
            usize::MAX
        } else {
            self.iterations as usize
        }
    }
    /// override fields by the command line arguments.
    /// Returns `Ok(false)` if the process should stop, for `--help` or `--version`.
    pub fn inject_from_args(&mut self) -> Result<bool, SamplingError> {
        self.inject_from(env::args().skip(1))
    }
    /// override fields by `args`, which doesn't include the program name.
    pub fn inject_from<I, S>(&mut self, args: I) -> Result<bool, SamplingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args = args
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>();
        let mut iter = args.iter();
        let mut target: Option<&String> = None;
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-h" | "--help" => {
                    println!("{HELP}");
                    return Ok(false);
                }
                "-V" | "--version" => {
                    println!("yasa {}", env!("CARGO_PKG_VERSION"));
                    return Ok(false);
                }
                "-q" | "--quiet" => self.quiet_mode = true,
                "-v" | "--verbose" => self.verbose = true,
                "--keep-initial" => self.allow_change_to_initial_sample = false,
                "--seed-counts" => self.initial_sample_counts_towards_limit = true,
                "-t" => self.t = parse_value!(iter, arg),
                "-i" | "--iterations" => self.iterations = parse_value!(iter, arg),
                "-l" | "--limit" => self.configuration_limit = parse_value!(iter, arg),
                "--internal-limit" => self.internal_solution_limit = parse_value!(iter, arg),
                "-s" | "--seed" => self.seed = parse_value!(iter, arg),
                "--timeout" => self.timeout = parse_value!(iter, arg),
                "--conflict-limit" => self.solver_conflict_limit = parse_value!(iter, arg),
                "--initial" => match iter.next() {
                    Some(f) => self.initial_sample_file = Some(PathBuf::from(f)),
                    None => {
                        return Err(SamplingError::InvalidParameter(
                            "--initial requires a file".to_string(),
                        ))
                    }
                },
                "-o" | "--output" => match iter.next() {
                    Some(f) => self.result_file = Some(PathBuf::from(f)),
                    None => {
                        return Err(SamplingError::InvalidParameter(
                            "--output requires a file".to_string(),
                        ))
                    }
                },
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    return Err(SamplingError::InvalidParameter(format!(
                        "unknown option {arg}"
                    )));
                }
                _ => target = Some(arg),
            }
        }
        match target {
            Some(path) => {
                self.cnf_file = PathBuf::from(path);
                Ok(true)
            }
            None => Err(SamplingError::InvalidParameter(
                "no CNF file given".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());
        let config = Config {
            t: 0,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SamplingError::InvalidParameter(_))
        ));
        let config = Config {
            iterations: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
        let config = Config {
            iterations: -1,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.num_passes(), usize::MAX);
        let config = Config {
            timeout: -1.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
    #[test]
    fn test_inject() {
        let mut config = Config::default();
        let args = ["-t", "3", "-l", "10", "--keep-initial", "-s", "42", "a.cnf"];
        assert!(matches!(config.inject_from(args), Ok(true)));
        assert_eq!(config.t, 3);
        assert_eq!(config.configuration_limit, 10);
        assert_eq!(config.seed, 42);
        assert!(!config.allow_change_to_initial_sample);
        assert_eq!(config.cnf_file, PathBuf::from("a.cnf"));
        assert!(config.inject_from(["--timeout", "2.5", "b.cnf"]).is_ok());
        assert_eq!(config.timeout, 2.5);
        let mut config = Config::default();
        assert!(config.inject_from(["-t", "x", "a.cnf"]).is_err());
        assert!(config.inject_from(["--bogus", "a.cnf"]).is_err());
        assert!(config.inject_from(["-i", "-1"]).is_err());
        assert_eq!(config.iterations, -1);
    }
}
