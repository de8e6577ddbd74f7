// A t-wise sampler for a formula in DIMACS CNF
use {
    std::{path::Path, process::exit, thread, time::Duration},
    tracing::{error, info, warn, Level},
    tracing_subscriber::FmtSubscriber,
    yasa::{
        validator::{coverage, validate},
        Config, CnfIf, Instantiate, Sample, SamplingError, Solver, Yasa, CNF,
    },
};

fn main() {
    let mut config = Config::default();
    match config.inject_from_args() {
        Ok(true) => (),
        Ok(false) => return,
        Err(e) => {
            eprintln!("{e}\nRun with --help for usage.");
            exit(1);
        }
    }
    let level = if config.quiet_mode {
        Level::ERROR
    } else if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set the tracing subscriber: {e}");
        exit(1);
    }
    let cnf = match CNF::load(&config.cnf_file) {
        Ok(cnf) => cnf,
        Err(e) => {
            error!("failed to load {}: {e}", config.cnf_file.display());
            exit(1);
        }
    };
    info!("{}: {cnf}", config.cnf_file.display());
    let initial = match config.initial_sample_file.as_ref().map(|f| Sample::load(f)) {
        Some(Ok(sample)) => sample,
        Some(Err(e)) => {
            error!("failed to load the initial sample: {e}");
            exit(1);
        }
        None => Vec::new(),
    };
    let mut yasa = match Yasa::new(config.clone(), &cnf) {
        Ok(yasa) => yasa.with_initial_sample(initial),
        Err(e) => {
            error!("{e}");
            exit(1);
        }
    };
    info!("{}", yasa.mig());
    if 0.0 < config.timeout {
        let monitor = yasa.monitor();
        let limit = Duration::from_secs_f64(config.timeout);
        thread::spawn(move || {
            thread::sleep(limit);
            monitor.cancel();
        });
    }
    let (sample, code) = match yasa.sample() {
        Ok(sample) => (sample, 0),
        Err(SamplingError::Cancelled) => {
            warn!("timed out; emit the best sample of the finished passes");
            match yasa.intermediate_result() {
                Ok(sample) => (sample, 0),
                Err(e) => degraded(e),
            }
        }
        Err(e) => degraded(e),
    };
    if sample.is_over_limit() {
        warn!("the configuration limit was reached; some combinations are uncovered");
    }
    for (i, c) in sample.iter().enumerate() {
        if let Some(clause) = validate(&cnf, c) {
            warn!("configuration #{i} falsifies {clause:?}");
        }
    }
    if let Err(e) = save(&sample, config.result_file.as_deref()) {
        error!("failed to save the sample: {e}");
        exit(1);
    }
    info!(
        size = sample.len(),
        passes = yasa.best_sample_sizes().len(),
        "sampled"
    );
    if !config.quiet_mode {
        let mut solver = Solver::instantiate(&config, &cnf);
        info!("{}", coverage(yasa.mig(), &mut solver, &sample, config.t));
    }
    exit(code);
}

fn degraded(e: SamplingError) -> (Sample, i32) {
    match e {
        SamplingError::Degraded { cause, partial } => {
            error!("{cause}");
            (partial, 2)
        }
        e => {
            error!("{e}");
            exit(1);
        }
    }
}

fn save(sample: &Sample, file: Option<&Path>) -> Result<(), SamplingError> {
    match file {
        Some(path) => {
            sample.save(path)?;
            info!("the sample was written to {}", path.display());
        }
        None => print!("{sample}"),
    }
    Ok(())
}
