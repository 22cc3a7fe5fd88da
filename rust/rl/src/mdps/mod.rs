pub mod mdp_simulator;
pub mod tables;
