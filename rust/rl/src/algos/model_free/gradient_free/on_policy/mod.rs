pub mod n_step_mc;
