pub mod participant_id;
