// Copyright (c) 2022 MASSA LABS <info@massa.net>

mod don_scenarios;
mod tools;
