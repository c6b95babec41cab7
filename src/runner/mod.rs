pub mod signal_run;
