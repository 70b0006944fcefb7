mod persistence;

pub use persistence::{
    load_plan, load_request, save_plan_csv, save_plan_json, save_request, write_plan_csv,
};
