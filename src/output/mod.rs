mod response;

pub use response::{
    exit_code_for_error, exit_code_to_u8, map_cmd_result_to_json, print_json_result, CliError,
    CliResponse,
};
